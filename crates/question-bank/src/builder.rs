//! Generation runs: fill a bank with new, deduplicated and numbered content.
//!
//! A run seeds a [`UniqueCollector`] with the bank's existing items, then asks
//! the generators for candidates until each planned count is met or the
//! attempt budget runs out. Accepted items are numbered after the highest ID
//! already in the bank.

use std::collections::{BTreeMap, BTreeSet};

use rand_chacha::ChaCha8Rng;

use crate::dedup::{DEFAULT_HISTORY_WINDOW, DEFAULT_MIN_DIFF, UniqueCollector};
use crate::error::GenerationError;
use crate::generator::{
    chance_matrix, chart_item, matematik_item, pie_assign, svenska_dnd, svenska_item,
    svenska_passage, table_fill,
};
use crate::ids::IdAllocator;
use crate::model::{Bank, Item, Subject};
use crate::plan::{MatematikTask, Plan, PlanTask, SvenskaTask};
use crate::profile::Profile;

/// Candidates tried per requested item before a task gives up.
pub const ATTEMPTS_PER_ITEM: usize = 30;

/// Near-duplicate filter settings for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Jaccard threshold; `None` keeps only the signature check.
    pub min_diff: Option<f64>,
    /// Number of recent prompts compared against.
    pub history_window: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            min_diff: Some(DEFAULT_MIN_DIFF),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

/// What to generate for a Swedish bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvenskaRequest {
    /// Standalone multiple-choice items per task.
    pub plan: Plan<SvenskaTask>,
    /// Drag-and-drop items.
    pub dnd: usize,
    /// Reading passages.
    pub passages: usize,
}

/// What to generate for a mathematics bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatematikRequest {
    /// Standalone multiple-choice items per task.
    pub plan: Plan<MatematikTask>,
    /// Bar chart items, alternating highest bar and difference.
    pub diagrams: usize,
    /// Table-fill items.
    pub tables: usize,
    /// Pie-assign items.
    pub pies: usize,
    /// Chance-matrix items.
    pub chances: usize,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Items and passages asked for.
    pub requested: usize,
    /// Items appended to the bank.
    pub added_items: usize,
    /// Passages appended to the bank.
    pub added_passages: usize,
    /// Candidates rejected as duplicates.
    pub rejected: usize,
    /// Missing count per task when the attempt budget ran out.
    pub shortfalls: BTreeMap<String, usize>,
    /// Next free item ID; empty once the numbering is exhausted.
    pub next_item_id: String,
    /// Next free passage ID, for subjects with passages.
    pub next_passage_id: Option<String>,
}

impl GenerationReport {
    /// Returns how many requested entries were not produced.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.shortfalls.values().sum()
    }
}

/// Which duplicate rule applies to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Similarity,
    Signature,
}

struct Run<'a> {
    bank: &'a mut Bank,
    collector: UniqueCollector,
    ids: IdAllocator,
    report: GenerationReport,
}

impl<'a> Run<'a> {
    fn start(bank: &'a mut Bank, subject: Subject, options: GenerationOptions) -> Self {
        let mut collector = UniqueCollector::new(options.min_diff, options.history_window);
        collector.seed(&bank.items);
        let ids = IdAllocator::scan(bank.ids(), subject.item_prefix());
        Self {
            bank,
            collector,
            ids,
            report: GenerationReport::default(),
        }
    }

    fn fill<F>(
        &mut self,
        label: &str,
        count: usize,
        guard: Guard,
        rng: &mut ChaCha8Rng,
        mut generate: F,
    ) -> Result<(), GenerationError>
    where
        F: FnMut(usize, &mut ChaCha8Rng) -> Result<Item, GenerationError>,
    {
        self.report.requested += count;
        let budget = count.saturating_mul(ATTEMPTS_PER_ITEM);
        let mut made = 0;
        let mut attempts = 0;
        while made < count && attempts < budget {
            attempts += 1;
            let mut item = generate(made, rng)?;
            let fresh = match guard {
                Guard::Similarity => self.collector.accept(&item),
                Guard::Signature => self.collector.accept_distinct(&item),
            };
            if !fresh {
                self.report.rejected += 1;
                continue;
            }
            item.id = self.ids.next_id()?;
            self.bank.items.push(item);
            made += 1;
        }
        self.report.added_items += made;
        self.record_shortfall(label, count, made);
        Ok(())
    }

    fn record_shortfall(&mut self, label: &str, count: usize, made: usize) {
        if made < count {
            let missing = count - made;
            tracing::debug!(task = label, missing, "attempt budget exhausted");
            *self.report.shortfalls.entry(label.to_owned()).or_default() += missing;
        }
    }

    fn finish(mut self) -> GenerationReport {
        self.report.next_item_id = self.ids.peek().unwrap_or_default();
        self.report
    }
}

/// Appends Swedish items, drag-and-drop items and passages to `bank`.
///
/// # Errors
///
/// Returns [`GenerationError`] when a generator cannot produce a candidate.
pub fn extend_svenska(
    bank: &mut Bank,
    request: &SvenskaRequest,
    profile: &Profile,
    options: GenerationOptions,
    rng: &mut ChaCha8Rng,
) -> Result<GenerationReport, GenerationError> {
    let mut passage_ids = IdAllocator::scan(bank.ids(), Subject::Svenska.passage_prefix());
    let mut run = Run::start(bank, Subject::Svenska, options);

    for (task, count) in request.plan.entries() {
        run.fill(task.key(), *count, Guard::Similarity, rng, |_, source| {
            svenska_item(*task, profile, source)
        })?;
    }
    run.fill("dnd", request.dnd, Guard::Signature, rng, |_, source| {
        svenska_dnd(profile, source)
    })?;

    let mut seen: BTreeSet<(String, String)> = run
        .bank
        .passages
        .iter()
        .map(|passage| (passage.title.clone(), passage.text.clone()))
        .collect();
    run.report.requested += request.passages;
    let budget = request.passages.saturating_mul(ATTEMPTS_PER_ITEM);
    let mut made = 0;
    let mut attempts = 0;
    while made < request.passages && attempts < budget {
        attempts += 1;
        let mut passage = svenska_passage(profile, rng)?;
        if !seen.insert((passage.title.clone(), passage.text.clone())) {
            run.report.rejected += 1;
            continue;
        }
        passage.id = passage_ids.next_id()?;
        for (number, question) in (1_usize..).zip(passage.questions.iter_mut()) {
            question.id = format!("{}-q{number}", passage.id);
        }
        run.bank.passages.push(passage);
        made += 1;
    }
    run.report.added_passages = made;
    run.record_shortfall("passager", request.passages, made);

    let mut report = run.finish();
    report.next_passage_id = passage_ids.peek();
    log_report(Subject::Svenska, &report);
    Ok(report)
}

/// Appends mathematics items, chart items and national-test tasks to `bank`.
///
/// # Errors
///
/// Returns [`GenerationError`] when a generator cannot produce a candidate,
/// for example when the division bounds leave no valid problem.
pub fn extend_matematik(
    bank: &mut Bank,
    request: &MatematikRequest,
    profile: &Profile,
    options: GenerationOptions,
    rng: &mut ChaCha8Rng,
) -> Result<GenerationReport, GenerationError> {
    let mut run = Run::start(bank, Subject::Matematik, options);

    for (task, count) in request.plan.entries() {
        run.fill(task.key(), *count, Guard::Similarity, rng, |_, source| {
            matematik_item(*task, profile, source)
        })?;
    }
    run.fill("diagram", request.diagrams, Guard::Signature, rng, |index, source| {
        chart_item(index, profile, source)
    })?;
    run.fill("table-fill", request.tables, Guard::Signature, rng, |_, source| {
        table_fill(profile, source)
    })?;
    run.fill("pie-assign", request.pies, Guard::Signature, rng, |_, source| {
        pie_assign(profile, source)
    })?;
    run.fill("chance-matrix", request.chances, Guard::Signature, rng, |_, source| {
        chance_matrix(profile, source)
    })?;

    let report = run.finish();
    log_report(Subject::Matematik, &report);
    Ok(report)
}

fn log_report(subject: Subject, report: &GenerationReport) {
    tracing::info!(
        %subject,
        requested = report.requested,
        items = report.added_items,
        passages = report.added_passages,
        rejected = report.rejected,
        shortfall = report.shortfall(),
        "generation finished"
    );
}
