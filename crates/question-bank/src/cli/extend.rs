//! `extend-bank`: append generated content to an existing bank.

use camino::Utf8PathBuf;
use clap::Parser;

use super::{
    CliError, ContentCounts, GenerationArgs, Generated, banks_dir, default_bank_path,
    describe_run, generate, preview,
};
use crate::backfill::{BackfillSummary, backfill};
use crate::config::BankSettings;
use crate::model::{Bank, Subject};
use crate::store::{BankFormat, backup, load_bank_or_empty, write_in_format};

/// Standalone items generated for svenska when `--items` is omitted.
pub const SVENSKA_DEFAULT_ITEMS: usize = 100;
/// Standalone items generated for matematik when `--items` is omitted.
pub const MATEMATIK_DEFAULT_ITEMS: usize = 200;

/// Arguments for `extend-bank`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "extend-bank",
    about = "Append generated items to an existing question bank",
    version
)]
pub struct ExtendArgs {
    /// Subject to generate.
    #[arg(long, value_enum)]
    pub subject: Subject,
    /// Bank file; defaults to `<banks dir>/<subject>.ak<grade>.json`.
    #[arg(long, value_name = "PATH")]
    pub out: Option<Utf8PathBuf>,
    /// Grade used for the default file name and for new banks.
    #[arg(long, default_value_t = 3)]
    pub grade: u32,
    /// Banks directory for the default file name.
    #[arg(long = "banks-dir", value_name = "DIR")]
    pub banks_dir: Option<Utf8PathBuf>,
    /// Standalone items; 100 for svenska, 200 for matematik.
    #[arg(long)]
    pub items: Option<usize>,
    /// Explicit `task=count,…` plan; overrides `--items`.
    #[arg(long)]
    pub plan: Option<String>,
    /// Drag-and-drop items (svenska).
    #[arg(long, default_value_t = 0)]
    pub dnd: usize,
    /// Reading passages (svenska).
    #[arg(long, default_value_t = 10)]
    pub passages: usize,
    /// Chart items (matematik).
    #[arg(long, default_value_t = 0)]
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
    /// Drop existing items and passages before generating.
    #[arg(long)]
    pub replace: bool,
    /// Print a preview instead of writing.
    #[arg(long)]
    pub dry: bool,
    /// Generation settings.
    #[command(flatten)]
    pub generation: GenerationArgs,
}

impl ExtendArgs {
    /// Returns the requested item count or the subject's default.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.unwrap_or(match self.subject {
            Subject::Svenska => SVENSKA_DEFAULT_ITEMS,
            Subject::Matematik => MATEMATIK_DEFAULT_ITEMS,
        })
    }
}

/// What `extend-bank` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendOutcome {
    /// Bank file.
    pub path: Utf8PathBuf,
    /// The extended bank.
    pub bank: Bank,
    /// Shape of the file before the run.
    pub format: BankFormat,
    /// Records skipped while loading.
    pub skipped: usize,
    /// Generation statistics.
    pub generated: Generated,
    /// Defaults filled in after generation.
    pub backfill: BackfillSummary,
    /// Copy of the previous file, if one was made.
    pub backup: Option<Utf8PathBuf>,
    /// Preview text for a dry run; `None` when the file was written.
    pub preview: Option<String>,
}

/// Loads the bank, appends generated content and writes it back.
///
/// A missing or malformed file starts an empty bank. Legacy two-subject
/// files keep their shape: only the section for the subject is replaced.
///
/// # Errors
///
/// Returns [`CliError`] when generation or writing fails.
pub fn run(args: &ExtendArgs, settings: &BankSettings) -> Result<ExtendOutcome, CliError> {
    let path = match &args.out {
        Some(out) => out.clone(),
        None => default_bank_path(
            &banks_dir(args.banks_dir.as_deref(), settings)?,
            args.subject,
            args.grade,
        ),
    };
    let loaded = load_bank_or_empty(&path, args.subject.as_str());
    if loaded.skipped > 0 {
        tracing::warn!(path = %path, skipped = loaded.skipped, "dropped unreadable records");
    }
    let siblings = loaded.siblings;
    let mut bank = loaded.bank;
    bank.subject = args.subject.as_str().to_owned();
    if bank.grade.is_none() {
        bank.grade = Some(args.grade);
    }
    if args.replace {
        bank.items.clear();
        bank.passages.clear();
    }
    let first_new = bank.items.len();

    let counts = ContentCounts {
        items: args.item_count(),
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

    let mut outcome = ExtendOutcome {
        path,
        bank,
        format: loaded.format,
        skipped: loaded.skipped,
        generated,
        backfill: fixes,
        backup: None,
        preview: None,
    };
    if args.dry {
        outcome.preview = Some(preview(&outcome.bank, first_new)?);
        return Ok(outcome);
    }
    outcome.backup = backup(&outcome.path)?;
    write_in_format(&outcome.path, &outcome.bank, outcome.format, &siblings)?;
    tracing::info!(path = %outcome.path, "bank written");
    Ok(outcome)
}

/// Renders the summary printed after a run.
#[must_use]
pub fn message(outcome: &ExtendOutcome) -> String {
    let mut lines = vec![
        describe_run(&outcome.generated),
        format!(
            "bank now holds {} item(s) and {} passage(s); next id {}",
            outcome.bank.items.len(),
            outcome.bank.passages.len(),
            outcome.generated.report.next_item_id
        ),
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
