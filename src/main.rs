//! mtx - Command-line tool for 2D CSS transform matrix algebra

use std::process::ExitCode;

use cssmatrix::cli;

fn main() -> ExitCode {
    cli::run()
}
