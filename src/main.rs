//! exact-json CLI.
//!
//! Parses documents from a file or stdin and prints one JSON report line per
//! result.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use exact_json::{parse_reader, stream_reader, Error, Limits, Value};

#[derive(Parser)]
#[command(name = "exact-json")]
#[command(about = "Parse JSON documents with exact numbers", long_about = None)]
#[command(version)]
struct Cli {
    /// Lift every resource limit (trusted input only)
    #[arg(long, global = true)]
    unbounded: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a whole document and summarize it
    Check {
        /// Input file, or `-` for stdin
        path: PathBuf,
    },

    /// Parse the top-level array lazily, one report per element
    Stream {
        /// Input file, or `-` for stdin
        path: PathBuf,
    },

    /// Show version information
    Version,
}

/// One output line.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Report {
    Ok(Summary),
    Err(Failure),
}

#[derive(Serialize)]
struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u64>,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Summary {
    fn of(value: &Value, index: Option<u64>) -> Self {
        let size = match value {
            Value::Object(map) => Some(map.len()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };
        Self {
            index,
            kind: value.type_name(),
            size,
            text: value.as_displayable_text().ok(),
        }
    }
}

#[derive(Serialize)]
struct Failure {
    code: u32,
    name: &'static str,
    message: String,
}

impl From<&Error> for Failure {
    fn from(e: &Error) -> Self {
        Self {
            code: e.code(),
            name: e.name(),
            message: e.to_string(),
        }
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(report: &Report) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{line}"),
        Err(e) => error!(error = %e, "failed to render report"),
    }
}

/// Report a failure and pick the exit code for it.
fn fail(e: &Error) -> ExitCode {
    emit(&Report::Err(Failure::from(e)));
    match e {
        Error::Io(_) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

fn open(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn check(path: &Path, limits: Limits) -> ExitCode {
    let input = match open(path) {
        Ok(input) => input,
        Err(e) => return fail(&Error::from(e)),
    };
    match parse_reader(input, limits) {
        Ok(value) => {
            emit(&Report::Ok(Summary::of(&value, None)));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn stream(path: &Path, limits: Limits) -> ExitCode {
    let input = match open(path) {
        Ok(input) => input,
        Err(e) => return fail(&Error::from(e)),
    };
    let values = match stream_reader(input, limits) {
        Ok(values) => values,
        Err(e) => return fail(&e),
    };

    for (index, result) in (0u64..).zip(values) {
        match result {
            Ok(value) => emit(&Report::Ok(Summary::of(&value, Some(index)))),
            Err(e) => return fail(&e),
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    setup_logging();
    let cli = Cli::parse();

    let limits = if cli.unbounded {
        Limits::unbounded()
    } else {
        Limits::standard()
    };
    debug!(?limits, "limits selected");

    match cli.command {
        Some(Commands::Check { path }) => check(&path, limits),
        Some(Commands::Stream { path }) => stream(&path, limits),
        Some(Commands::Version) => {
            println!("exact-json v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        None => {
            println!("exact-json v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            ExitCode::SUCCESS
        }
    }
}
