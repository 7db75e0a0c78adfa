//! `augment-bank`: retune division and add chart items to a math bank.

use camino::Utf8PathBuf;
use clap::Parser;

use super::{CliError, GenerationArgs, Generated, Toggle, describe_run, preview};
use crate::augment::{add_diagrams, retune_division};
use crate::backfill::backfill;
use crate::config::BankSettings;
use crate::model::{Bank, Subject};
use crate::store::{BankFormat, backup, load_bank, write_in_format};

/// Arguments for `augment-bank`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "augment-bank",
    about = "Retune division items and add chart items to a mathematics bank",
    version
)]
pub struct AugmentArgs {
    /// Bank file to upgrade in place.
    #[arg(long, value_name = "PATH")]
    pub bank: Utf8PathBuf,
    /// Chart items to append.
    #[arg(long = "add-diagrams", default_value_t = 16)]
    pub add_diagrams: usize,
    /// Remove division items outside the level's bounds.
    #[arg(long = "retune-division", value_enum, default_value = "yes")]
    pub retune_division: Toggle,
    /// Print a preview instead of writing.
    #[arg(long)]
    pub dry: bool,
    /// Generation settings.
    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// What `augment-bank` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentOutcome {
    /// Bank file.
    pub path: Utf8PathBuf,
    /// The upgraded bank.
    pub bank: Bank,
    /// Division items removed.
    pub removed: usize,
    /// Chart generation statistics.
    pub generated: Generated,
    /// Copy of the previous file, if one was made.
    pub backup: Option<Utf8PathBuf>,
    /// Preview text for a dry run; `None` when the file was written.
    pub preview: Option<String>,
}

/// Upgrades the bank in place, keeping a `.bak` copy of the previous file
/// and the shape of a legacy two-subject document.
///
/// # Errors
///
/// Returns [`CliError::MissingFile`] when the bank does not exist, and
/// [`CliError`] for unreadable files or generation failures.
pub fn run(args: &AugmentArgs, settings: &BankSettings) -> Result<AugmentOutcome, CliError> {
    let loaded = load_bank(&args.bank, Subject::Matematik.as_str())?;
    if loaded.format == BankFormat::Missing {
        return Err(CliError::MissingFile {
            path: args.bank.clone(),
        });
    }
    let mut bank = loaded.bank;
    let profile = args.generation.profile();

    let removed = if args.retune_division.enabled() {
        retune_division(&mut bank, &profile)
    } else {
        0
    };
    let first_new = bank.items.len();
    let options = args.generation.options(settings)?;
    let (seed, mut rng) = args.generation.rng();
    let report = add_diagrams(&mut bank, args.add_diagrams, &profile, options, &mut rng)?;
    backfill(&mut bank);

    let generated = Generated { seed, report };
    if args.dry {
        return Ok(AugmentOutcome {
            preview: Some(preview(&bank, first_new)?),
            path: args.bank.clone(),
            bank,
            removed,
            generated,
            backup: None,
        });
    }
    let saved = backup(&args.bank)?;
    write_in_format(&args.bank, &bank, loaded.format, &loaded.siblings)?;
    tracing::info!(path = %args.bank, "bank written");
    Ok(AugmentOutcome {
        path: args.bank.clone(),
        bank,
        removed,
        generated,
        backup: saved,
        preview: None,
    })
}

/// Renders the summary printed after a run.
#[must_use]
pub fn message(outcome: &AugmentOutcome) -> String {
    let mut lines = vec![
        format!("division retune removed {} item(s)", outcome.removed),
        describe_run(&outcome.generated),
        format!("bank now holds {} item(s)", outcome.bank.items.len()),
    ];
    if let Some(backup_path) = &outcome.backup {
        lines.push(format!("backup: {backup_path}"));
    }
    lines.push(outcome.preview.as_ref().map_or_else(
        || format!("wrote {}", outcome.path),
        |text| format!("dry run, {} not written; first new items:\n{text}", outcome.path),
    ));
    lines.join("\n")
}
