//! Lists, indexes, migrates, registers and checks the banks of a directory.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use question_bank::cli::banks_tool::{self, BanksToolArgs};
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
    let args = BanksToolArgs::parse();
    let settings = BankSettings::load("banks-tool")?;
    let output = banks_tool::run(&args, &settings, Utc::now())?;
    write_stdout(&output);
    Ok(())
}
