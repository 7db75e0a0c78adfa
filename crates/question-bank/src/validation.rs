//! Read-only structural checks for bank documents.
//!
//! Validation works on raw JSON rather than the typed model so that banks the
//! model would reject can still be reported on. Problems are either critical,
//! which fail verification, or warnings, which do not.
//!
//! # Checks
//!
//! - IDs are unique across items, passages and passage questions
//! - choice items have at least two non-empty options and an in-range answer
//! - chart items carry a consistent dataset and the right answer
//! - interactive items carry the fields their renderer needs
//! - hints and explanations are present (warning)
//! - passage answers about place, activity or object occur in the text
//!   (warning)

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};

use crate::error::BankError;
use crate::index::{INDEX_FILE, resolve_entry_path};
use crate::store::read_json_value;

/// Prompt fragments whose answer must be quoted from the passage.
const TEXT_BOUND_PROMPTS: &[&str] = &[
    "var är",
    "var utspelar",
    "vad gjorde",
    "vad gör",
    "vad var viktigt",
    "vad blir viktigt",
];

/// Types whose renderer does not show an explanation.
const EXPLAIN_OPTIONAL: &[&str] = &["dnd", "table-fill", "pie-assign"];

/// Legacy two-subject files checked when no manifest lists any bank.
pub const LEGACY_FILES: &[&str] = &["svenska.json", "matematik.json"];

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Breaks the application; fails verification.
    Critical,
    /// Degrades the experience.
    Warning,
}

/// One finding about a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Severity of the finding.
    pub severity: Severity,
    /// ID of the record, or `?` when it has none.
    pub id: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.severity {
            Severity::Critical => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{marker}: {}: {}", self.id, self.message)
    }
}

/// Findings for one bank file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankReport {
    /// Display name: the manifest label or the file name.
    pub name: String,
    /// Declared subject, if any.
    pub subject: Option<String>,
    /// Number of standalone items.
    pub items: usize,
    /// Number of passages.
    pub passages: usize,
    /// IDs that occur more than once.
    pub duplicate_ids: Vec<String>,
    /// Every finding, in document order.
    pub issues: Vec<Issue>,
}

impl BankReport {
    /// Returns the number of critical findings.
    #[must_use]
    pub fn critical(&self) -> usize {
        self.count(Severity::Critical)
    }

    /// Returns the number of warnings.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

/// Where the list of banks to verify came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifySource {
    /// Files given on the command line.
    Explicit,
    /// Entries of `index.json`.
    Index,
    /// Legacy `svenska.json` / `matematik.json`.
    Legacy,
}

/// Outcome of verifying a set of banks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Where the bank list came from.
    pub source: VerifySource,
    /// One report per bank that could be read.
    pub reports: Vec<BankReport>,
    /// Banks that are listed but missing or unreadable.
    pub failures: Vec<String>,
}

impl Verification {
    /// Returns the number of critical findings, counting failed banks.
    #[must_use]
    pub fn critical(&self) -> usize {
        self.failures.len() + self.reports.iter().map(BankReport::critical).sum::<usize>()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.reports.iter().map(BankReport::warnings).sum()
    }

    /// Whether nothing critical was found.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.critical() == 0
    }
}

/// Validates a parsed bank document.
///
/// Single-subject documents are checked as a whole; legacy documents are
/// checked section by section.
///
/// # Examples
///
/// ```
/// use question_bank::validation::validate_document;
///
/// let document = serde_json::json!({
///     "subject": "matematik",
///     "items": [
///         {"id": "ma-001", "type": "mc", "q": "2 + 2 =", "options": ["4", "5"], "correct": 3},
///         {"id": "ma-001", "q": "3 + 3 =", "options": ["6", "7"], "correct": 0, "hint": "Dubbla.", "explain": "6"}
///     ]
/// });
///
/// let report = validate_document("matematik.ak3.json", &document);
/// assert_eq!(report.duplicate_ids, ["ma-001"]);
/// assert_eq!(report.critical(), 2);
/// assert_eq!(report.warnings(), 2);
/// ```
#[must_use]
pub fn validate_document(name: &str, document: &Value) -> BankReport {
    let mut report = BankReport {
        name: name.to_owned(),
        subject: document
            .get("subject")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        items: 0,
        passages: 0,
        duplicate_ids: duplicate_ids(document),
        issues: Vec::new(),
    };
    for id in &report.duplicate_ids {
        report.issues.push(Issue {
            severity: Severity::Critical,
            id: id.clone(),
            message: "duplicate id".to_owned(),
        });
    }
    for section in sections(document) {
        report.items += array(section, "items").len();
        report.passages += array(section, "passages").len();
        check_section(section, &mut report.issues);
    }
    report
}

/// Reads and validates one bank file.
///
/// # Errors
///
/// Returns [`BankError`] when the file cannot be read or is not JSON.
pub fn validate_file(path: &Utf8Path, label: Option<&str>) -> Result<BankReport, BankError> {
    let document = read_json_value(path)?;
    let name = label.map_or_else(
        || path.file_name().unwrap_or(path.as_str()).to_owned(),
        ToOwned::to_owned,
    );
    Ok(validate_document(&name, &document))
}

/// Returns the IDs that occur more than once, in first-seen order.
#[must_use]
pub fn duplicate_ids(document: &Value) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut order = Vec::new();
    for section in sections(document) {
        let items = array(section, "items").iter();
        let passages = array(section, "passages").iter().flat_map(|passage| {
            std::iter::once(passage).chain(passage.get("questions").map_or(&[][..], as_slice))
        });
        for id in items.chain(passages).filter_map(|record| record.get("id")?.as_str()) {
            let count = counts.entry(id).or_default();
            *count += 1;
            if *count == 2 {
                order.push(id.to_owned());
            }
        }
    }
    order
}

/// Verifies the banks of `dir`.
///
/// Explicit files win; otherwise every entry of `index.json` is checked;
/// otherwise the legacy two-subject files are.
///
/// # Errors
///
/// Returns [`BankError`] when `index.json` exists but cannot be parsed.
pub fn verify_banks(dir: &Utf8Path, explicit: &[Utf8PathBuf]) -> Result<Verification, BankError> {
    let mut verification = Verification {
        source: VerifySource::Explicit,
        reports: Vec::new(),
        failures: Vec::new(),
    };
    let targets: Vec<(Utf8PathBuf, Option<String>)> = if explicit.is_empty() {
        match index_targets(dir)? {
            Some(listed) => {
                verification.source = VerifySource::Index;
                listed
            }
            None => {
                verification.source = VerifySource::Legacy;
                LEGACY_FILES
                    .iter()
                    .map(|name| dir.join(name))
                    .filter(|path| path.exists())
                    .map(|path| (path, None))
                    .collect()
            }
        }
    } else {
        explicit.iter().map(|path| (path.clone(), None)).collect()
    };

    for (path, label) in targets {
        match validate_file(&path, label.as_deref()) {
            Ok(report) => verification.reports.push(report),
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "bank could not be verified");
                verification.failures.push(err.to_string());
            }
        }
    }
    Ok(verification)
}

/// Bank files listed in the manifest, or `None` without a usable manifest.
fn index_targets(dir: &Utf8Path) -> Result<Option<Vec<(Utf8PathBuf, Option<String>)>>, BankError> {
    let document = match read_json_value(&dir.join(INDEX_FILE)) {
        Ok(document) => document,
        Err(BankError::NotFound { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };
    let Some(entries) = ["banks", "entries"].iter().find_map(|key| {
        document
            .get(*key)
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
    }) else {
        tracing::warn!(dir = %dir, "index lists no banks, falling back to legacy files");
        return Ok(None);
    };
    let targets = entries
        .iter()
        .map(|entry| {
            let location = ["path", "file"]
                .iter()
                .find_map(|key| entry.get(*key).and_then(Value::as_str))
                .unwrap_or_default();
            let label = entry.get("label").and_then(Value::as_str).map(ToOwned::to_owned);
            (resolve_entry_path(dir, location), label)
        })
        .collect();
    Ok(Some(targets))
}

/// The item-bearing sections of a document: the document itself, or each
/// subject section of a legacy file.
fn sections(document: &Value) -> Vec<&Map<String, Value>> {
    let Some(root) = document.as_object() else {
        return Vec::new();
    };
    if root.contains_key("items") || root.contains_key("subject") {
        return vec![root];
    }
    root.values()
        .filter_map(Value::as_object)
        .filter(|section| section.contains_key("items") || section.contains_key("passages"))
        .collect()
}

fn as_slice(value: &Value) -> &[Value] {
    value.as_array().map_or(&[], Vec::as_slice)
}

fn array<'a>(section: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    section.get(key).map_or(&[], as_slice)
}

fn non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|text| !text.trim().is_empty())
}

struct Findings<'a> {
    id: &'a str,
    issues: &'a mut Vec<Issue>,
}

impl Findings<'_> {
    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            id: self.id.to_owned(),
            message: message.into(),
        });
    }

    fn critical(&mut self, message: impl Into<String>) {
        self.push(Severity::Critical, message);
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }
}

fn check_section(section: &Map<String, Value>, issues: &mut Vec<Issue>) {
    for item in array(section, "items") {
        check_item(item, issues);
    }
    for passage in array(section, "passages") {
        let haystack = format!(
            "{} {}",
            passage.get("title").and_then(Value::as_str).unwrap_or_default(),
            passage.get("text").and_then(Value::as_str).unwrap_or_default()
        )
        .to_lowercase();
        for question in passage.get("questions").map_or(&[][..], as_slice) {
            check_question(question, &haystack, issues);
        }
    }
}

fn record_id(record: &Value) -> &str {
    record.get("id").and_then(Value::as_str).unwrap_or("?")
}

fn check_item(item: &Value, issues: &mut Vec<Issue>) {
    let mut findings = Findings {
        id: record_id(item),
        issues,
    };
    let kind = match item.get("type") {
        None | Some(Value::Null) => "mc",
        Some(Value::String(kind)) if kind.trim().is_empty() => "mc",
        Some(Value::String(kind)) => kind.as_str(),
        Some(_) => "?",
    };
    match kind {
        "mc" => {
            check_choice(item, &mut findings);
        }
        "bar-max" | "bar-compare" => {
            check_chart(item, kind, &mut findings);
            check_choice(item, &mut findings);
        }
        "dnd" => {
            let tiles = item.get("tiles").or_else(|| item.get("tokens"));
            if tiles.map_or(0, |list| as_slice(list).len()) < 2 {
                findings.critical("dnd needs at least two tiles");
            }
            if item.get("buckets").map_or(0, |list| as_slice(list).len()) < 2 {
                findings.critical("dnd needs at least two buckets");
            }
        }
        "table-fill" => {
            let table = item.get("table");
            let has = |key: &str| {
                table
                    .and_then(|inner| inner.get(key))
                    .is_some_and(Value::is_array)
            };
            if !has("headers") || !has("rows") {
                findings.critical("table-fill needs table.headers and table.rows");
            }
        }
        "pie-assign" => {
            if !item.get("segments").is_some_and(Value::is_array)
                || !item.get("labels").is_some_and(Value::is_array)
            {
                findings.critical("pie-assign needs segments and labels");
            }
        }
        "chance-matrix" => {
            if !item.get("context").is_some_and(Value::is_object)
                || !item.get("statements").is_some_and(Value::is_array)
            {
                findings.critical("chance-matrix needs context and statements");
            }
        }
        other => findings.critical(format!("unknown type '{other}'")),
    }

    if !non_empty_str(item.get("hint")) {
        findings.warning("missing hint");
    }
    if !non_empty_str(item.get("explain")) && !EXPLAIN_OPTIONAL.contains(&kind) {
        findings.warning("missing explain");
    }
}

fn check_question(question: &Value, haystack: &str, issues: &mut Vec<Issue>) {
    let mut findings = Findings {
        id: record_id(question),
        issues,
    };
    let chosen = check_choice(question, &mut findings);
    if !non_empty_str(question.get("hint")) {
        findings.warning("missing hint");
    }
    if !non_empty_str(question.get("explain")) {
        findings.warning("missing explain");
    }

    let prompt = question
        .get("q")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    if let Some(answer) = chosen
        && TEXT_BOUND_PROMPTS.iter().any(|key| prompt.contains(key))
        && !haystack.contains(&answer.to_lowercase())
    {
        findings.warning(format!("answer '{answer}' does not occur in the passage"));
    }
}

/// Checks options and `correct`; returns the correct option when valid.
fn check_choice<'a>(record: &'a Value, findings: &mut Findings<'_>) -> Option<&'a str> {
    let options = match record.get("options").and_then(Value::as_array) {
        Some(options) if options.len() >= 2 => options,
        _ => {
            findings.critical("needs at least two options");
            return None;
        }
    };
    for (position, option) in options.iter().enumerate() {
        if !non_empty_str(Some(option)) {
            findings.critical(format!("options[{position}] is not a non-empty string"));
        }
    }
    let correct = record
        .get("correct")
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < options.len());
    let Some(index) = correct else {
        findings.critical(format!(
            "correct is outside [0, {}]",
            options.len().saturating_sub(1)
        ));
        return None;
    };
    options.get(index).and_then(Value::as_str)
}

fn check_chart(item: &Value, kind: &str, findings: &mut Findings<'_>) {
    let Some(chart) = item.get("chart").filter(|value| value.is_object()) else {
        findings.critical("chart item is missing 'chart'");
        return;
    };
    let labels = chart.get("labels").map_or(&[][..], as_slice);
    let values = chart.get("values").map_or(&[][..], as_slice);
    if labels.len() != values.len() || labels.len() < 2 {
        findings.critical("chart.labels and chart.values must have the same length of at least 2");
        return;
    }
    if !labels.iter().all(|label| non_empty_str(Some(label))) {
        findings.critical("chart.labels must be strings");
    }
    let numbers: Vec<Option<f64>> = values
        .iter()
        .map(|value| value.as_f64().filter(|number| *number >= 0.0))
        .collect();
    if numbers.iter().any(Option::is_none) {
        findings.critical("chart.values must be non-negative numbers");
        return;
    }
    let options = item.get("options").map_or(&[][..], as_slice);
    let correct = item.get("correct").and_then(Value::as_u64);

    if kind == "bar-max" {
        if options != labels {
            findings.critical("bar-max options must equal chart.labels");
        }
        let mut best = 0_usize;
        let mut best_value = f64::MIN;
        for (position, value) in numbers.iter().flatten().enumerate() {
            if *value > best_value {
                best = position;
                best_value = *value;
            }
        }
        if correct != u64::try_from(best).ok() {
            findings.critical(format!("correct should be {best}, the highest bar"));
        }
        return;
    }

    let parsed: Option<Vec<i64>> = options
        .iter()
        .map(|option| option.as_str().and_then(|text| text.trim().parse().ok()))
        .collect();
    let Some(candidates) = parsed else {
        findings.critical("bar-compare options must be integer strings");
        return;
    };
    let prompt = item
        .get("q")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    let named: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| {
            label
                .as_str()
                .is_some_and(|text| mentions(&prompt, &text.to_lowercase()))
        })
        .map(|(position, _)| position)
        .collect();
    let (Some(first), Some(second)) = (named.first(), named.get(1)) else {
        return;
    };
    let value_at = |position: &usize| values.get(*position).and_then(Value::as_i64);
    let (Some(left), Some(right)) = (value_at(first), value_at(second)) else {
        return;
    };
    let difference = (left - right).abs();
    match candidates.iter().position(|candidate| *candidate == difference) {
        Some(expected) if correct == u64::try_from(expected).ok() => {}
        Some(expected) => findings.critical(format!(
            "correct should be {expected}, the difference {difference}"
        )),
        None => findings.critical(format!("options lack the difference {difference}")),
    }
}

/// Whether `needle` occurs in `haystack` as a whole word.
fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack.get(..start).and_then(|head| head.chars().next_back());
        let after = haystack
            .get(start + needle.len()..)
            .and_then(|tail| tail.chars().next());
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn messages(report: &BankReport, severity: Severity) -> Vec<String> {
        report
            .issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .map(|issue| issue.message.clone())
            .collect()
    }

    fn chart_item(kind: &str, q: &str, options: Value, correct: usize) -> Value {
        json!({
            "id": "ma-001", "type": kind, "q": q, "hint": "h", "explain": "e",
            "chart": {"labels": ["Röd", "Blå", "Grön", "Gul"], "values": [3, 8, 5, 8], "unit": "st", "title": "T"},
            "options": options, "correct": correct
        })
    }

    fn bank(items: Value) -> Value {
        json!({"subject": "matematik", "items": items})
    }

    #[test]
    fn clean_bank_has_no_findings() {
        let document = bank(json!([
            {"id": "ma-001", "type": "mc", "q": "2 + 2 =", "options": ["4", "5"], "correct": 0, "hint": "h", "explain": "e"},
            chart_item("bar-max", "Vilken har flest?", json!(["Röd", "Blå", "Grön", "Gul"]), 1),
        ]));

        let report = validate_document("bank.json", &document);

        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.items, 2);
    }

    #[rstest]
    #[case(json!(["4"]), json!(0), "needs at least two options")]
    #[case(json!(["4", ""]), json!(0), "options[1] is not a non-empty string")]
    #[case(json!(["4", "5"]), json!(2), "correct is outside [0, 1]")]
    #[case(json!(["4", "5"]), json!(-1), "correct is outside [0, 1]")]
    fn choice_problems_are_critical(
        #[case] options: Value,
        #[case] correct: Value,
        #[case] expected: &str,
    ) {
        let document = bank(json!([
            {"id": "ma-001", "q": "?", "options": options, "correct": correct, "hint": "h", "explain": "e"}
        ]));

        let report = validate_document("bank.json", &document);

        assert_eq!(messages(&report, Severity::Critical), [expected]);
    }

    #[rstest]
    #[case(json!(0), 0)]
    #[case(json!("0"), 1)]
    #[case(json!(5), 1)]
    fn tagged_mc_items_check_their_answer(#[case] correct: Value, #[case] critical: usize) {
        let document = bank(json!([
            {"id": "ma-001", "type": "mc", "q": "3 + 4 =", "options": ["7", "8"], "correct": correct, "hint": "h", "explain": "e"}
        ]));

        let report = validate_document("bank.json", &document);

        assert_eq!(report.critical(), critical, "{:?}", report.issues);
    }

    #[test]
    fn bar_max_must_point_at_the_first_highest_bar() {
        let document = bank(json!([chart_item(
            "bar-max",
            "Vilken har flest?",
            json!(["Röd", "Blå", "Grön", "Gul"]),
            3
        )]));

        let report = validate_document("bank.json", &document);

        assert_eq!(
            messages(&report, Severity::Critical),
            ["correct should be 1, the highest bar"]
        );
    }

    #[rstest]
    #[case("Hur många fler st är det i Blå än i Röd?", 0, 0)]
    #[case("Hur många fler st är det i Blå än i Röd?", 1, 1)]
    #[case("Hur många fler st är det i Blåbär än i Rödbeta?", 1, 0)]
    fn bar_compare_checks_the_named_difference(
        #[case] q: &str,
        #[case] correct: usize,
        #[case] critical: usize,
    ) {
        let document = bank(json!([chart_item("bar-compare", q, json!(["5", "4", "6"]), correct)]));

        let report = validate_document("bank.json", &document);

        assert_eq!(report.critical(), critical, "{:?}", report.issues);
    }

    #[test]
    fn interactive_types_need_their_payloads() {
        let document = bank(json!([
            {"id": "a", "type": "dnd", "q": "Dra.", "tiles": ["x"], "buckets": [{"label": "A"}], "hint": "h"},
            {"id": "b", "type": "table-fill", "q": "Fyll.", "table": {"headers": []}, "hint": "h"},
            {"id": "c", "type": "pie-assign", "q": "Para.", "segments": [], "hint": "h"},
            {"id": "d", "type": "chance-matrix", "q": "Kryssa.", "context": {}, "statements": [], "hint": "h", "explain": "e"},
            {"id": "e", "type": "hologram", "q": "?", "hint": "h", "explain": "e"}
        ]));

        let report = validate_document("bank.json", &document);

        assert_eq!(
            messages(&report, Severity::Critical),
            [
                "dnd needs at least two tiles",
                "dnd needs at least two buckets",
                "table-fill needs table.headers and table.rows",
                "pie-assign needs segments and labels",
                "unknown type 'hologram'",
            ]
        );
        assert_eq!(report.warnings(), 0);
    }

    #[test]
    fn passage_answers_must_come_from_the_text() {
        let document = json!({
            "subject": "svenska",
            "items": [],
            "passages": [{
                "id": "sv-p-001", "title": "Ali i parken", "text": "Ali var i parken. Hen läste.",
                "questions": [
                    {"id": "sv-p-001-q1", "q": "Var utspelar sig texten?", "options": ["parken", "skolan"], "correct": 0, "hint": "h", "explain": "e"},
                    {"id": "sv-p-001-q2", "q": "Vad gjorde Ali?", "options": ["sprang", "läste"], "correct": 0, "hint": "h", "explain": "e"},
                    {"id": "sv-p-001-q3", "q": "Hur kändes det?", "options": ["bra", "dåligt"], "correct": 1, "hint": "h", "explain": "e"}
                ]
            }]
        });

        let report = validate_document("svenska.ak3.json", &document);

        assert_eq!(
            messages(&report, Severity::Warning),
            ["answer 'sprang' does not occur in the passage"]
        );
        assert_eq!(report.passages, 1);
    }

    #[test]
    fn legacy_documents_are_checked_per_section() {
        let document = json!({
            "bankVersion": "1.0",
            "svenska": {"items": [{"id": "x-1", "q": "?", "options": ["a", "b"], "correct": 0, "hint": "h", "explain": "e"}], "passages": []},
            "matematik": {"items": [{"id": "x-1", "q": "?", "options": ["1"], "correct": 0, "hint": "h", "explain": "e"}]}
        });

        let report = validate_document("legacy.json", &document);

        assert_eq!(report.items, 2);
        assert_eq!(report.duplicate_ids, ["x-1"]);
        assert_eq!(report.critical(), 2);
    }

    #[test]
    fn duplicates_span_passages_and_questions() {
        let document = json!({
            "subject": "svenska",
            "items": [{"id": "sv-p-001"}],
            "passages": [{"id": "sv-p-001", "questions": [{"id": "q"}, {"id": "q"}, {"id": "q"}]}]
        });

        assert_eq!(duplicate_ids(&document), ["sv-p-001", "q"]);
    }

    #[rstest]
    #[case("i röd än i blå", "röd", true)]
    #[case("i rödbeta", "röd", false)]
    #[case("röd", "röd", true)]
    #[case("", "röd", false)]
    fn whole_word_mentions(#[case] haystack: &str, #[case] needle: &str, #[case] expected: bool) {
        assert_eq!(mentions(haystack, needle), expected);
    }
}
