//! `banks-tool`: housekeeping over a banks directory.
//!
//! Subcommands list the banks, rebuild `index.json`, convert the legacy
//! two-subject files, register a single bank file and look for duplicate IDs.
//! Each one returns the text to print so the binary stays a thin shell.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;

use super::{CliError, banks_dir};
use crate::backfill::backfill;
use crate::config::BankSettings;
use crate::error::BankError;
use crate::index::{
    bank_identity, default_label, describe, list_bank_files, rebuild, write_index,
};
use crate::model::Subject;
use crate::store::{
    BankFormat, backup, bank_from_value, load_bank, read_json_value, write_bank, write_in_format,
};
use crate::validation::duplicate_ids;

/// Duplicate IDs listed per bank by `verify`.
const SHOWN_DUPLICATES: usize = 10;

/// Arguments for `banks-tool`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "banks-tool",
    about = "List, index, migrate, register and check question banks",
    version
)]
pub struct BanksToolArgs {
    /// Banks directory; defaults to the configured one.
    #[arg(long = "banks-dir", value_name = "DIR", global = true)]
    pub banks_dir: Option<Utf8PathBuf>,
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// `banks-tool` subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List bank files with their subject, grade and size.
    List,
    /// Rebuild `index.json` from the bank files.
    Index,
    /// Convert `svenska.json` and `matematik.json` into `<subject>.ak<grade>.json`.
    MigrateLegacy {
        /// Grade written into the converted banks.
        #[arg(long)]
        grade: u32,
    },
    /// Normalise a bank file, label it and rebuild `index.json`; the previous
    /// file is kept as `<file>.bak`.
    Add {
        /// Bank file to register.
        #[arg(long, value_name = "PATH")]
        file: Utf8PathBuf,
        /// Display name; defaults to the existing label or `<Subject> åk <grade>`.
        #[arg(long)]
        label: Option<String>,
        /// Grade for files that declare none.
        #[arg(long)]
        grade: Option<u32>,
    },
    /// Report duplicate IDs in every bank.
    Verify,
}

/// Runs the selected subcommand and returns the text to print.
///
/// # Errors
///
/// Returns [`CliError`] when a required file is missing, a bank cannot be
/// identified, or reading or writing fails.
pub fn run(
    args: &BanksToolArgs,
    settings: &BankSettings,
    now: DateTime<Utc>,
) -> Result<String, CliError> {
    let dir = banks_dir(args.banks_dir.as_deref(), settings)?;
    tracing::debug!(banks_dir = %dir, "banks-tool");
    let lines = match &args.command {
        Command::List => list(&dir)?,
        Command::Index => vec![index(&dir, now)?],
        Command::MigrateLegacy { grade } => migrate_legacy(&dir, *grade)?,
        Command::Add { file, label, grade } => {
            add(&dir, file, label.as_deref(), *grade, now)?
        }
        Command::Verify => verify(&dir)?,
    };
    Ok(lines.join("\n"))
}

fn list(dir: &Utf8Path) -> Result<Vec<String>, CliError> {
    let files = list_bank_files(dir)?;
    if files.is_empty() {
        return Ok(vec![format!("no banks in {dir}")]);
    }
    Ok(files
        .iter()
        .map(|path| match describe(path) {
            Ok(summary) => format!(
                "- {} ({}, åk {}): items={}, passages={}",
                summary.file,
                summary.subject.as_deref().unwrap_or("?"),
                summary
                    .grade
                    .map_or_else(|| "?".to_owned(), |grade| grade.to_string()),
                summary.items,
                summary.passages
            ),
            Err(err) => format!("- {}: unreadable: {err}", path.file_name().unwrap_or("?")),
        })
        .collect())
}

fn index(dir: &Utf8Path, now: DateTime<Utc>) -> Result<String, CliError> {
    let document = rebuild(dir, now)?;
    let path = write_index(dir, &document)?;
    Ok(format!("wrote {path} ({} bank(s))", document.banks.len()))
}

fn migrate_legacy(dir: &Utf8Path, grade: u32) -> Result<Vec<String>, CliError> {
    let mut lines = Vec::new();
    let mut wrote = 0_usize;
    for subject in [Subject::Svenska, Subject::Matematik] {
        let source = dir.join(format!("{subject}.json"));
        let loaded = load_bank(&source, subject.as_str())?;
        if loaded.format == BankFormat::Missing {
            lines.push(format!("not found: {source}"));
            continue;
        }
        let mut bank = loaded.bank;
        bank.subject = subject.as_str().to_owned();
        bank.grade = Some(grade);
        backfill(&mut bank);
        let target = dir.join(format!("{subject}.ak{grade}.json"));
        write_bank(&target, &bank)?;
        wrote += 1;
        lines.push(format!(
            "wrote {target} (items={}, passages={})",
            bank.items.len(),
            bank.passages.len()
        ));
    }
    lines.push(if wrote == 0 {
        format!("nothing to migrate: no legacy bank files in {dir}")
    } else {
        "run `banks-tool index` to rebuild index.json".to_owned()
    });
    Ok(lines)
}

fn add(
    dir: &Utf8Path,
    file: &Utf8Path,
    label: Option<&str>,
    grade: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Vec<String>, CliError> {
    let document = match read_json_value(file) {
        Ok(document) => document,
        Err(BankError::NotFound { path }) => return Err(CliError::MissingFile { path }),
        Err(err) => return Err(err.into()),
    };
    let (declared_subject, declared_grade) = bank_identity(file, &document);
    let subject = declared_subject.ok_or_else(|| CliError::UnknownSubject {
        path: file.to_path_buf(),
    })?;
    let resolved_grade = declared_grade
        .or(grade)
        .ok_or_else(|| CliError::UnknownGrade {
            path: file.to_path_buf(),
        })?;

    let loaded = bank_from_value(file, document, &subject)?;
    let mut bank = loaded.bank;
    bank.subject = subject;
    bank.grade = Some(resolved_grade);
    let display_name = label
        .map(ToOwned::to_owned)
        .or_else(|| bank.label.take().filter(|text| !text.trim().is_empty()))
        .unwrap_or_else(|| default_label(&bank.subject, Some(resolved_grade)));
    bank.label = Some(display_name);
    let fixes = backfill(&mut bank);
    let saved = backup(file)?;
    write_in_format(file, &bank, loaded.format, &loaded.siblings)?;

    let mut lines = vec![format!(
        "normalised {file} ({} item(s), {} filled, {} answer(s) reset)",
        bank.items.len(),
        fixes.filled,
        fixes.corrected
    )];
    if loaded.skipped > 0 {
        lines.push(format!("dropped {} unreadable record(s)", loaded.skipped));
    }
    if let Some(backup_path) = saved {
        lines.push(format!("backup: {backup_path}"));
    }
    lines.push(index(dir, now)?);
    Ok(lines)
}

fn verify(dir: &Utf8Path) -> Result<Vec<String>, CliError> {
    let mut lines = Vec::new();
    let mut clean = true;
    for path in list_bank_files(dir)? {
        let name = path.file_name().unwrap_or("?");
        let document = match read_json_value(&path) {
            Ok(document) => document,
            Err(err) => {
                lines.push(format!("- {name}: skipped: {err}"));
                continue;
            }
        };
        let count = |key: &str| document.get(key).and_then(Value::as_array).map_or(0, Vec::len);
        lines.push(format!(
            "- {name} ({}): items={}, passages={}",
            document.get("subject").and_then(Value::as_str).unwrap_or("?"),
            count("items"),
            count("passages")
        ));
        let duplicates = duplicate_ids(&document);
        if !duplicates.is_empty() {
            clean = false;
            let shown: Vec<&str> = duplicates
                .iter()
                .take(SHOWN_DUPLICATES)
                .map(String::as_str)
                .collect();
            lines.push(format!("  duplicate ids: {}", shown.join(", ")));
        }
    }
    if clean {
        lines.push("no duplicate ids found".to_owned());
    }
    Ok(lines)
}
