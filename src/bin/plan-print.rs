//! Binary entry point that prints a serialized query plan.
#![forbid(unsafe_code)]

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use plan_printer::{
    cli::plan_file::{load_plan, CliError},
    query::{print_with_options, PrinterOptions},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "plan-print",
    version,
    about = "Render a query execution plan as indented text"
)]
struct Cli {
    #[arg(value_name = "PLAN", default_value = "-", help = "JSON plan file, or - for stdin")]
    plan: PathBuf,

    #[arg(
        long,
        env = "PLAN_PRINT_INDENT_WIDTH",
        default_value_t = 4,
        help = "Spaces per indent level"
    )]
    indent_width: usize,

    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format"
    )]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let plan = load_plan(&cli.plan)?;

    match cli.format {
        OutputFormat::Text => {
            let options = PrinterOptions::default().with_indent_width(cli.indent_width);
            print_with_options(&plan, options).map_err(CliError::from)?;
        }
        OutputFormat::Json => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &plan).map_err(CliError::from)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
