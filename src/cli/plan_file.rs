use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::query::{PlanNode, PrintError};

/// Error type for the plan-printing CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// IO error while reading the plan.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The input was not a valid serialized plan.
    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Printing failed.
    #[error(transparent)]
    Print(#[from] PrintError),
}

/// Reads a plan tree from `path`, or from stdin when `path` is `-`.
pub fn load_plan(path: &Path) -> Result<PlanNode, CliError> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        return read_plan(stdin.lock());
    }
    let file = File::open(path)?;
    let plan = read_plan(BufReader::new(file))?;
    debug!(path = %path.display(), nodes = plan.node_count(), "loaded plan");
    Ok(plan)
}

/// Parses a plan tree from a JSON reader.
pub fn read_plan<R: Read>(reader: R) -> Result<PlanNode, CliError> {
    Ok(serde_json::from_reader(reader)?)
}
