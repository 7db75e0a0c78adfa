//! `create-bank`: build a brand-new single-subject bank.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;

use super::{
    CliError, ContentCounts, GenerationArgs, Generated, banks_dir, default_bank_path,
    describe_run, generate, preview,
};
use crate::backfill::{BackfillSummary, backfill};
use crate::config::BankSettings;
use crate::index::{
    IndexEntry, default_label, load_index, site_path, subject_code, upsert, write_index,
};
use crate::model::{Bank, Subject};
use crate::store::write_bank;

/// Arguments for `create-bank`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-bank",
    about = "Generate a new question bank for one subject",
    version
)]
pub struct CreateArgs {
    /// Subject to generate.
    #[arg(long, value_enum)]
    pub subject: Subject,
    /// School grade.
    #[arg(long, default_value_t = 3)]
    pub grade: u32,
    /// Manifest ID; defaults to `<code>-ak<grade>`.
    #[arg(long = "bank-id", value_name = "ID")]
    pub bank_id: Option<String>,
    /// Display name; defaults to `<Subject> åk <grade>`.
    #[arg(long)]
    pub label: Option<String>,
    /// Short description.
    #[arg(long = "desc", value_name = "TEXT")]
    pub description: Option<String>,
    /// Standalone items, spread evenly over the subject's tasks.
    #[arg(long, default_value_t = 120)]
    pub items: usize,
    /// Explicit `task=count,…` plan; overrides `--items`.
    #[arg(long)]
    pub plan: Option<String>,
    /// Drag-and-drop items (svenska).
    #[arg(long, default_value_t = 8)]
    pub dnd: usize,
    /// Reading passages (svenska).
    #[arg(long, default_value_t = 6)]
    pub passages: usize,
    /// Chart items (matematik).
    #[arg(long, default_value_t = 16)]
    pub diagrams: usize,
    /// Table-fill items (matematik).
    #[arg(long, default_value_t = 0)]
    pub table: usize,
    /// Pie-assign items (matematik).
    #[arg(long, default_value_t = 0)]
    pub pie: usize,
    /// Chance-matrix items (matematik).
    #[arg(long, default_value_t = 0)]
    pub chance: usize,
    /// Output file; defaults to `<banks dir>/<subject>.ak<grade>.json`.
    #[arg(long, value_name = "PATH")]
    pub out: Option<Utf8PathBuf>,
    /// Banks directory holding `index.json`.
    #[arg(long = "banks-dir", value_name = "DIR")]
    pub banks_dir: Option<Utf8PathBuf>,
    /// Register the bank in `index.json`.
    #[arg(long = "update-index")]
    pub update_index: bool,
    /// Print a preview instead of writing.
    #[arg(long)]
    pub dry: bool,
    /// Generation settings.
    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// What `create-bank` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// Target file.
    pub path: Utf8PathBuf,
    /// The generated bank.
    pub bank: Bank,
    /// Generation statistics.
    pub generated: Generated,
    /// Defaults filled in after generation.
    pub backfill: BackfillSummary,
    /// The manifest entry written, if any.
    pub entry: Option<IndexEntry>,
    /// Preview text for a dry run; `None` when the file was written.
    pub preview: Option<String>,
}

/// Generates the bank and writes it, registering it when asked.
///
/// # Errors
///
/// Returns [`CliError`] when generation, writing or the manifest update
/// fails.
pub fn run(
    args: &CreateArgs,
    settings: &BankSettings,
    now: DateTime<Utc>,
) -> Result<CreateOutcome, CliError> {
    let dir = banks_dir(args.banks_dir.as_deref(), settings)?;
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| default_bank_path(&dir, args.subject, args.grade));

    let mut bank = Bank::empty(args.subject.as_str());
    bank.grade = Some(args.grade);
    bank.label = Some(
        args.label
            .clone()
            .unwrap_or_else(|| default_label(args.subject.as_str(), Some(args.grade))),
    );
    bank.description = args.description.clone();

    let counts = ContentCounts {
        items: args.items,
        plan: args.plan.as_deref(),
        dnd: args.dnd,
        passages: args.passages,
        diagrams: args.diagrams,
        tables: args.table,
        pies: args.pie,
        chances: args.chance,
    };
    let generated = generate(&mut bank, args.subject, &counts, &args.generation, settings)?;
    let fixes = backfill(&mut bank);

    if args.dry {
        return Ok(CreateOutcome {
            preview: Some(preview(&bank, 0)?),
            path,
            bank,
            generated,
            backfill: fixes,
            entry: None,
        });
    }

    write_bank(&path, &bank)?;
    tracing::info!(path = %path, "bank written");
    let entry = if args.update_index {
        Some(register(&dir, &path, &bank, args.bank_id.as_deref(), now)?)
    } else {
        None
    };
    Ok(CreateOutcome {
        path,
        bank,
        generated,
        backfill: fixes,
        entry,
        preview: None,
    })
}

fn register(
    dir: &Utf8Path,
    path: &Utf8Path,
    bank: &Bank,
    bank_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<IndexEntry, CliError> {
    let grade = bank.grade.unwrap_or(0);
    let entry = IndexEntry {
        id: bank_id.map_or_else(
            || format!("{}-ak{grade}", subject_code(&bank.subject)),
            ToOwned::to_owned,
        ),
        subject: bank.subject.clone(),
        grade,
        path: site_path(dir, path),
        label: bank
            .label
            .clone()
            .unwrap_or_else(|| default_label(&bank.subject, bank.grade)),
        description: bank.description.clone(),
    };
    let mut document = load_index(dir)?;
    upsert(&mut document, entry.clone());
    document.generated_at = Some(now);
    write_index(dir, &document)?;
    Ok(entry)
}

/// Renders the summary printed after a run.
#[must_use]
pub fn message(outcome: &CreateOutcome) -> String {
    let mut lines = vec![
        format!("subject: {}", outcome.bank.subject),
        format!("label: {}", outcome.bank.label.as_deref().unwrap_or("")),
        describe_run(&outcome.generated),
    ];
    lines.push(outcome.preview.as_ref().map_or_else(
        || format!("wrote {}", outcome.path),
        |text| format!("dry run, {} not written; first items:\n{text}", outcome.path),
    ));
    if let Some(entry) = &outcome.entry {
        lines.push(format!("index.json: '{}' -> '{}'", entry.id, entry.path));
    }
    lines.join("\n")
}
