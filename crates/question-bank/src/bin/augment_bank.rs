//! Retunes division items and adds chart items to a mathematics bank.

use std::process::ExitCode;

use clap::Parser;
use question_bank::cli::augment::{self, AugmentArgs};
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
    let args = AugmentArgs::parse();
    let settings = BankSettings::load("augment-bank")?;
    let outcome = augment::run(&args, &settings)?;
    write_stdout(&augment::message(&outcome));
    Ok(())
}
