//! Command-line front ends for the bank tools.
//!
//! Each binary parses its arguments with clap and hands them to a `run`
//! function in one of these modules, so every tool can be exercised in tests
//! without spawning a process. Shared flags live in [`GenerationArgs`].

pub mod augment;
pub mod banks_tool;
pub mod create;
mod error;
pub mod extend;
pub mod verify;

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{EnvFilter, fmt};

pub use error::CliError;

use crate::builder::{
    GenerationOptions, GenerationReport, MatematikRequest, SvenskaRequest, extend_matematik,
    extend_svenska,
};
use crate::config::{BankSettings, checked_threshold};
use crate::model::{Bank, Item, Subject};
use crate::plan::Plan;
use crate::profile::{Level, Profile};
use crate::store::to_pretty_json;

/// Items shown by a `--dry` preview.
pub const PREVIEW_ITEMS: usize = 3;

/// A `yes`/`no` flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Enabled.
    Yes,
    /// Disabled.
    No,
}

impl Toggle {
    /// Returns whether the toggle is on.
    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Flags shared by every tool that generates items.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct GenerationArgs {
    /// Difficulty level.
    #[arg(long, value_enum, default_value = "np")]
    pub level: Level,
    /// RNG seed; a random seed is drawn and reported when omitted.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
    /// Jaccard threshold between 0 and 1; higher is stricter.
    #[arg(long = "min-diff", value_name = "RATIO")]
    pub min_diff: Option<f64>,
    /// Reject prompts too similar to recent ones.
    #[arg(long = "unique-guard", value_enum, default_value = "yes")]
    pub unique_guard: Toggle,
    /// Cap on division dividends.
    #[arg(long = "max-dividend", value_name = "N")]
    pub max_dividend: Option<u32>,
    /// Allow the nine table in division.
    #[arg(long = "allow-nine", value_enum, default_value = "no")]
    pub allow_nine: Toggle,
}

impl Default for GenerationArgs {
    fn default() -> Self {
        Self {
            level: Level::Np,
            seed: None,
            min_diff: None,
            unique_guard: Toggle::Yes,
            max_dividend: None,
            allow_nine: Toggle::No,
        }
    }
}

impl GenerationArgs {
    /// Returns the difficulty profile with division overrides applied.
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile::for_level(self.level)
            .with_division_overrides(self.max_dividend, self.allow_nine.enabled())
    }

    /// Resolves the near-duplicate filter from flags and settings.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ConfigError`] for a threshold outside 0 to 1.
    pub fn options(&self, settings: &BankSettings) -> Result<GenerationOptions, CliError> {
        let min_diff = if self.unique_guard.enabled() {
            Some(
                self.min_diff
                    .map_or_else(|| settings.min_diff(), checked_threshold)?,
            )
        } else {
            None
        };
        Ok(GenerationOptions {
            min_diff,
            history_window: settings.history_window(),
        })
    }

    /// Returns the seed in use and an RNG seeded with it.
    #[must_use]
    pub fn rng(&self) -> (u64, ChaCha8Rng) {
        let seed = self.seed.unwrap_or_else(rand::random);
        (seed, ChaCha8Rng::seed_from_u64(seed))
    }
}

/// How much content a generating tool asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCounts<'a> {
    /// Standalone items when no plan is given.
    pub items: usize,
    /// Explicit `task=count` plan.
    pub plan: Option<&'a str>,
    /// Drag-and-drop items (svenska).
    pub dnd: usize,
    /// Reading passages (svenska).
    pub passages: usize,
    /// Chart items (matematik).
    pub diagrams: usize,
    /// Table-fill items (matematik).
    pub tables: usize,
    /// Pie-assign items (matematik).
    pub pies: usize,
    /// Chance-matrix items (matematik).
    pub chances: usize,
}

/// A finished generation run and the seed that reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Seed the RNG was built from.
    pub seed: u64,
    /// What the run produced.
    pub report: GenerationReport,
}

/// Generates content for `subject` into `bank`.
///
/// # Errors
///
/// Returns [`CliError`] for a malformed plan, an invalid threshold or a
/// generator failure.
pub fn generate(
    bank: &mut Bank,
    subject: Subject,
    counts: &ContentCounts<'_>,
    generation: &GenerationArgs,
    settings: &BankSettings,
) -> Result<Generated, CliError> {
    let profile = generation.profile();
    let options = generation.options(settings)?;
    let (seed, mut rng) = generation.rng();
    tracing::info!(seed, %subject, level = %generation.level, "generating");
    let report = match subject {
        Subject::Svenska => {
            let request = SvenskaRequest {
                plan: Plan::resolve(counts.plan, counts.items)?,
                dnd: counts.dnd,
                passages: counts.passages,
            };
            extend_svenska(bank, &request, &profile, options, &mut rng)?
        }
        Subject::Matematik => {
            let request = MatematikRequest {
                plan: Plan::resolve(counts.plan, counts.items)?,
                diagrams: counts.diagrams,
                tables: counts.tables,
                pies: counts.pies,
                chances: counts.chances,
            };
            extend_matematik(bank, &request, &profile, options, &mut rng)?
        }
    };
    Ok(Generated { seed, report })
}

/// Renders the first [`PREVIEW_ITEMS`] items from index `from` onwards.
///
/// # Errors
///
/// Returns [`CliError::BankError`] if serialisation fails.
pub fn preview(bank: &Bank, from: usize) -> Result<String, CliError> {
    let shown: Vec<&Item> = bank.items.iter().skip(from).take(PREVIEW_ITEMS).collect();
    Ok(to_pretty_json(&shown)?)
}

/// Summarises a generation run in one or two lines.
#[must_use]
pub fn describe_run(generated: &Generated) -> String {
    let report = &generated.report;
    let mut text = format!(
        "added {} item(s) and {} passage(s) of {} requested, {} duplicate(s) rejected (seed {})",
        report.added_items,
        report.added_passages,
        report.requested,
        report.rejected,
        generated.seed
    );
    if report.shortfall() > 0 {
        let missing: Vec<String> = report
            .shortfalls
            .iter()
            .map(|(task, count)| format!("{task}={count}"))
            .collect();
        text.push_str(&format!(
            "\nshort by {}: {}",
            report.shortfall(),
            missing.join(", ")
        ));
    }
    text
}

/// Resolves the banks directory: the flag, then settings, then the default.
///
/// # Errors
///
/// Returns [`CliError::ConfigError`] for a non-UTF-8 configured path.
pub fn banks_dir(
    flag: Option<&Utf8Path>,
    settings: &BankSettings,
) -> Result<Utf8PathBuf, CliError> {
    flag.map_or_else(
        || settings.banks_dir().map_err(CliError::from),
        |dir| Ok(dir.to_path_buf()),
    )
}

/// Returns `<banks dir>/<subject>.ak<grade>.json`.
#[must_use]
pub fn default_bank_path(dir: &Utf8Path, subject: Subject, grade: u32) -> Utf8PathBuf {
    dir.join(format!("{subject}.ak{grade}.json"))
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default
/// `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(err) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        drop(err);
    }
}

/// Writes `message` and a newline to stdout, ignoring a closed pipe.
pub fn write_stdout(message: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}

/// Writes `message` and a newline to stderr.
pub fn write_stderr(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}

#[cfg(test)]
mod tests;
