#![forbid(unsafe_code)]

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias for plan printing.
pub type Result<T> = std::result::Result<T, PrintError>;

/// Errors that abort a print.
///
/// Both variants are fatal: the printer stops at the first one and lines
/// already written to the sink are left as they are.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Traversal reached a node kind with no rendering rule.
    #[error("no rendering rule for plan node kind '{kind}'")]
    UnsupportedNodeKind {
        /// Name of the offending node kind.
        kind: &'static str,
    },
    /// The output sink rejected a write.
    #[error("failed to write plan output: {0}")]
    OutputWrite(#[from] io::Error),
}

impl PrintError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            PrintError::UnsupportedNodeKind { .. } => "UnsupportedNodeKind",
            PrintError::OutputWrite(_) => "OutputWriteFailure",
        }
    }

    /// Returns true when the error came from the output sink.
    pub fn is_io(&self) -> bool {
        matches!(self, PrintError::OutputWrite(_))
    }
}

/// Formats a print error prefixed with its code.
pub struct PrintErrorWithCode<'a>(pub &'a PrintError);

impl fmt::Display for PrintErrorWithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}
