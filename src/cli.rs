//! Command-line interface implementation

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;

use crate::matrix::Matrix;
use crate::parse::{parse_transform, ParseOutcome};

/// Exit codes: clap reports usage errors with its own code 2
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

/// mtx - 2D CSS transform matrix algebra on the command line
#[derive(Parser)]
#[command(name = "mtx")]
#[command(about = "Parse, compose, invert, and decompose CSS 2D transforms")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand that reads a transform list.
#[derive(Args)]
pub struct ParseFlags {
    /// Fail on 3D transform functions instead of skipping them
    #[arg(long)]
    pub safe_3d: bool,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Emit a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a transform list and print the composed matrix
    Parse {
        /// CSS transform-list string, e.g. "rotate(20deg) scale(1.2)"
        transform: String,

        #[command(flatten)]
        flags: ParseFlags,
    },

    /// Invert the composed matrix of a transform list
    Invert {
        /// CSS transform-list string
        transform: String,

        #[command(flatten)]
        flags: ParseFlags,
    },

    /// Decompose a transform list into elementary transforms
    Decompose {
        /// CSS transform-list string
        transform: String,

        #[command(flatten)]
        flags: ParseFlags,
    },

    /// Apply a transform list to a point
    Apply {
        /// CSS transform-list string
        transform: String,

        /// X coordinate of the point
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Y coordinate of the point
        #[arg(allow_negative_numbers = true)]
        y: f64,

        #[command(flatten)]
        flags: ParseFlags,
    },
}

#[derive(Serialize)]
struct MatrixReport {
    kind: String,
    matrix: [f64; 6],
}

impl MatrixReport {
    fn new(matrix: &Matrix) -> Self {
        Self { kind: matrix.kind().name().to_string(), matrix: matrix.css_vector() }
    }
}

#[derive(Serialize)]
struct DecomposeReport {
    factors: Vec<MatrixReport>,
}

#[derive(Serialize)]
struct PointReport {
    x: f64,
    y: f64,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { transform, flags } => run_parse(&transform, &flags),
        Commands::Invert { transform, flags } => run_invert(&transform, &flags),
        Commands::Decompose { transform, flags } => run_decompose(&transform, &flags),
        Commands::Apply { transform, x, y, flags } => run_apply(&transform, x, y, &flags),
    }
}

/// Parse the transform list, print warnings, and enforce strict mode.
fn load_transform(transform: &str, flags: &ParseFlags) -> Result<ParseOutcome, ExitCode> {
    let outcome = match parse_transform(transform, flags.safe_3d) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    for warning in &outcome.warnings {
        eprintln!("Warning: {}: {}", warning.function, warning.message);
    }
    if flags.strict && !outcome.warnings.is_empty() {
        eprintln!("Error: warnings are fatal in strict mode");
        return Err(ExitCode::from(EXIT_ERROR));
    }

    Ok(outcome)
}

fn run_parse(transform: &str, flags: &ParseFlags) -> ExitCode {
    let outcome = match load_transform(transform, flags) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let composed = Matrix::compose(&outcome.matrices);

    if flags.json {
        return emit_json(&MatrixReport::new(&composed));
    }
    println!("{}", composed);
    println!("kind: {}", composed.kind());
    println!("{}", composed.describe());
    ExitCode::from(EXIT_SUCCESS)
}

fn run_invert(transform: &str, flags: &ParseFlags) -> ExitCode {
    let outcome = match load_transform(transform, flags) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let composed = Matrix::compose(&outcome.matrices);

    let inverse = match composed.inverse() {
        Ok(inverse) => inverse,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if flags.json {
        return emit_json(&MatrixReport::new(&inverse));
    }
    println!("{}", inverse);
    ExitCode::from(EXIT_SUCCESS)
}

fn run_decompose(transform: &str, flags: &ParseFlags) -> ExitCode {
    let outcome = match load_transform(transform, flags) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let composed = Matrix::compose(&outcome.matrices);
    let factors = composed.decompose();

    if flags.json {
        let report = DecomposeReport { factors: factors.iter().map(MatrixReport::new).collect() };
        return emit_json(&report);
    }
    if factors.is_empty() {
        println!("identity (nothing to decompose)");
    }
    for factor in &factors {
        println!("{}  {}", factor, factor.describe());
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn run_apply(transform: &str, x: f64, y: f64, flags: &ParseFlags) -> ExitCode {
    let outcome = match load_transform(transform, flags) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let composed = Matrix::compose(&outcome.matrices);
    let (px, py) = composed.transform_point(x, y);

    if flags.json {
        return emit_json(&PointReport { x: px, y: py });
    }
    println!("({}, {})", px, py);
    ExitCode::from(EXIT_SUCCESS)
}

fn emit_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: cannot serialize report: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_matrix_report_shape() {
        let report = MatrixReport::new(&Matrix::scaling(2.0, 3.0));
        assert_eq!(report.kind, "scale");
        assert_eq!(report.matrix, [2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"scale\""));
    }
}
