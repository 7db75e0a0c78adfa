//! Validates question banks, exiting with 1 when anything critical is found.

use std::process::ExitCode;

use clap::Parser;
use question_bank::cli::verify::{self, VerifyArgs};
use question_bank::cli::{CliError, init_tracing, write_stderr, write_stdout};
use question_bank::config::BankSettings;

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            write_stderr(&err.to_string());
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let args = VerifyArgs::parse();
    let settings = BankSettings::load("verify-banks")?;
    let verification = verify::run(&args, &settings)?;
    write_stdout(&verify::render(&verification));
    verify::ensure_passed(&verification)
}
