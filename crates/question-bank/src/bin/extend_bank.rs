//! Appends generated items and passages to an existing question bank.

use std::process::ExitCode;

use clap::Parser;
use question_bank::cli::extend::{self, ExtendArgs};
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
    let args = ExtendArgs::parse();
    let settings = BankSettings::load("extend-bank")?;
    let outcome = extend::run(&args, &settings)?;
    write_stdout(&extend::message(&outcome));
    Ok(())
}
