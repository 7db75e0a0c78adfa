//! Generates a brand-new question bank.
//!
//! Argument handling and generation live in `question_bank::cli::create`;
//! this binary only wires stdout, stderr and the exit code.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use question_bank::cli::create::{self, CreateArgs};
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
    let args = CreateArgs::parse();
    let settings = BankSettings::load("create-bank")?;
    let outcome = create::run(&args, &settings, Utc::now())?;
    write_stdout(&create::message(&outcome));
    Ok(())
}
