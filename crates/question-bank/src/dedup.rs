//! Near-duplicate filtering for generated items.
//!
//! Every candidate gets a signature built from its type, area, normalised
//! prompt and structural payload. A [`UniqueCollector`] rejects repeated
//! signatures and, when a threshold is configured, candidates whose word set
//! is too close to one of the recently accepted questions.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::model::{Item, ItemKind};

/// Default Jaccard threshold at which two questions count as near-duplicates.
pub const DEFAULT_MIN_DIFF: f64 = 0.72;

/// Default number of recently accepted questions compared against.
pub const DEFAULT_HISTORY_WINDOW: usize = 400;

const STRIPPED: [char; 9] = ['.', ',', '!', '?', ':', ';', '-', '–', '—'];

/// Lower-cases text, collapses whitespace and strips sentence punctuation.
///
/// # Example
///
/// ```
/// use question_bank::normalize_text;
///
/// assert_eq!(normalize_text("  Vilket   ord, stavas RÄTT? "), "vilket ord stavas rätt");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|ch| !STRIPPED.contains(ch))
        .collect()
}

/// Splits normalised text into its set of words.
#[must_use]
pub fn word_set(text: &str) -> BTreeSet<String> {
    normalize_text(text)
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect()
}

/// Jaccard similarity of two word sets. Two empty sets are identical.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "Jaccard similarity is a ratio of set sizes"
)]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    as_f64(shared) / as_f64(union)
}

/// Returns `true` when the word sets of two texts reach `threshold`.
#[must_use]
pub fn too_similar(first: &str, second: &str, threshold: f64) -> bool {
    jaccard(&word_set(first), &word_set(second)) >= threshold
}

fn as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Builds the dedup signature of an item.
///
/// Choice items contribute their sorted option set so that a reshuffled copy
/// of the same question collides. Structured items contribute a canonical
/// rendering of their payload.
#[must_use]
pub fn signature(item: &Item) -> String {
    let head = format!(
        "{}|{}|{}",
        item.type_name(),
        item.area,
        normalize_text(&item.q)
    );
    let tail = match &item.kind {
        ItemKind::Mc { options, .. } => sorted_normalized(options),
        ItemKind::BarMax { chart, options, .. } | ItemKind::BarCompare { chart, options, .. } => {
            let values = chart
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("{}|{values}", sorted_normalized(options))
        }
        ItemKind::Dnd { buckets, tiles, .. } => {
            let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();
            format!("{}|{}", sorted_normalized(&labels), sorted_normalized(tiles))
        }
        ItemKind::TableFill { table, .. } => table
            .rows
            .iter()
            .map(|row| format!("{}:{}", row.key, row.cells.join(",")))
            .collect::<Vec<_>>()
            .join("|"),
        ItemKind::PieAssign {
            segments, labels, ..
        } => {
            let parts = segments
                .iter()
                .map(|segment| format!("{}:{}", segment.id, segment.percent))
                .collect::<Vec<_>>()
                .join(",");
            format!("{parts}|{}", sorted_normalized(labels))
        }
        ItemKind::ChanceMatrix {
            context,
            statements,
        } => {
            let counts = context
                .iter()
                .map(|(colour, count)| format!("{colour}={count}"))
                .collect::<Vec<_>>()
                .join(",");
            let texts = statements
                .iter()
                .map(|statement| normalize_text(&statement.text))
                .collect::<Vec<_>>()
                .join("|");
            format!("{counts}|{texts}")
        }
        ItemKind::Other(payload) => serde_json::to_string(payload).unwrap_or_default(),
    };
    format!("{head}|{tail}")
}

fn sorted_normalized(values: &[String]) -> String {
    let mut normalized: Vec<String> = values.iter().map(|v| normalize_text(v)).collect();
    normalized.sort();
    normalized.join("|")
}

/// The text a learner reads for an item: the prompt followed by any visible
/// alternatives.
fn question_text(item: &Item) -> String {
    let extras: &[String] = match &item.kind {
        ItemKind::Mc { options, .. }
        | ItemKind::BarMax { options, .. }
        | ItemKind::BarCompare { options, .. } => options,
        ItemKind::Dnd { tiles, .. } => tiles,
        ItemKind::PieAssign { labels, .. } => labels,
        ItemKind::TableFill { .. } | ItemKind::ChanceMatrix { .. } | ItemKind::Other(_) => &[],
    };
    let mut text = item.q.clone();
    for extra in extras {
        text.push(' ');
        text.push_str(extra);
    }
    text
}

/// Accepts or rejects candidate items during one generation run.
///
/// # Example
///
/// ```
/// use question_bank::{Item, ItemKind, UniqueCollector};
///
/// let item = Item::new(
///     "addition",
///     "12 + 5 =",
///     ItemKind::Mc { options: vec!["17".into(), "16".into()], correct: 0 },
/// );
/// let mut collector = UniqueCollector::new(Some(0.72), 400);
///
/// assert!(collector.accept(&item));
/// assert!(!collector.accept(&item));
/// ```
#[derive(Debug, Clone)]
pub struct UniqueCollector {
    signatures: HashSet<String>,
    recent: VecDeque<BTreeSet<String>>,
    window: usize,
    threshold: Option<f64>,
}

impl UniqueCollector {
    /// Creates a collector. `threshold` of `None` disables the similarity
    /// check and keeps only the signature rule.
    #[must_use]
    pub fn new(threshold: Option<f64>, window: usize) -> Self {
        Self {
            signatures: HashSet::new(),
            recent: VecDeque::with_capacity(window),
            window,
            threshold,
        }
    }

    /// Pre-loads signatures of items already present in a bank.
    pub fn seed<'a>(&mut self, existing: impl IntoIterator<Item = &'a Item>) {
        for item in existing {
            self.signatures.insert(signature(item));
        }
    }

    /// Accepts an item whose signature is new and whose question text is not
    /// too similar to any recently accepted question.
    pub fn accept(&mut self, item: &Item) -> bool {
        let sig = signature(item);
        if self.signatures.contains(&sig) {
            return false;
        }
        let words = word_set(&question_text(item));
        if let Some(threshold) = self.threshold
            && self
                .recent
                .iter()
                .any(|previous| jaccard(previous, &words) >= threshold)
        {
            return false;
        }
        self.signatures.insert(sig);
        self.remember(words);
        true
    }

    /// Accepts an item on the signature rule alone.
    ///
    /// Used for structured items whose prompt is a fixed template.
    pub fn accept_distinct(&mut self, item: &Item) -> bool {
        if !self.signatures.insert(signature(item)) {
            return false;
        }
        self.remember(word_set(&question_text(item)));
        true
    }

    /// Number of distinct signatures seen, including seeded ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns `true` when no signature has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    fn remember(&mut self, words: BTreeSet<String>) {
        if self.window == 0 {
            return;
        }
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(words);
    }
}

impl Default for UniqueCollector {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MIN_DIFF), DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::{Bucket, Chart};

    fn mc(area: &str, q: &str, options: &[&str]) -> Item {
        Item::new(
            area,
            q,
            ItemKind::Mc {
                options: options.iter().map(|o| (*o).to_owned()).collect(),
                correct: 0,
            },
        )
    }

    #[rstest]
    #[case("Hej  då!", "hej då")]
    #[case("A – B — C", "a  b  c")]
    #[case("  12 ÷ 4 =  ", "12 ÷ 4 =")]
    #[case("", "")]
    fn normalize_text_strips_punctuation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_text(input), expected);
    }

    #[test]
    fn jaccard_of_two_empty_sets_is_one() {
        let empty = BTreeSet::new();
        assert!(jaccard(&empty, &empty) >= 1.0);
    }

    #[test]
    fn identical_texts_are_too_similar() {
        assert!(too_similar("Vilket ord är ett verb?", "vilket ord är ett VERB", 0.72));
        assert!(!too_similar("12 + 5 =", "30 − 8 =", 0.72));
    }

    #[test]
    fn signature_ignores_option_order() {
        let first = mc("stavning", "Vilket ord stavas rätt?", &["själv", "skjälv", "själv"]);
        let second = mc("stavning", "Vilket ord stavas rätt?", &["själv", "själv", "skjälv"]);

        assert_eq!(signature(&first), signature(&second));
    }

    #[test]
    fn dnd_signature_includes_tiles() {
        let make = |tiles: &[&str]| {
            Item::new(
                "grammatik",
                "Dra orden till rätt kategori.",
                ItemKind::Dnd {
                    buckets: vec![Bucket::new("Verb"), Bucket::new("Substantiv")],
                    tiles: tiles.iter().map(|t| (*t).to_owned()).collect(),
                    solution: std::collections::BTreeMap::new(),
                },
            )
        };

        assert_ne!(
            signature(&make(&["läser", "katt"])),
            signature(&make(&["springer", "bord"]))
        );
    }

    #[test]
    fn chart_signature_includes_values() {
        let make = |values: Vec<u32>| {
            Item::new(
                "diagram",
                "Vilken har flest i 'Sålda frukter'?",
                ItemKind::BarMax {
                    chart: Chart {
                        labels: vec!["Röd".to_owned(), "Blå".to_owned()],
                        values,
                        unit: "st".to_owned(),
                        title: "Sålda frukter".to_owned(),
                    },
                    options: vec!["Röd".to_owned(), "Blå".to_owned()],
                    correct: 0,
                },
            )
        };

        assert_ne!(signature(&make(vec![3, 1])), signature(&make(vec![1, 3])));
    }

    #[test]
    fn collector_rejects_near_duplicate_questions() {
        let mut collector = UniqueCollector::new(Some(0.72), 400);

        assert!(collector.accept(&mc("addition", "3 + 4 =", &["7", "6", "8", "5"])));
        assert!(!collector.accept(&mc("addition", "4 + 3 =", &["7", "8", "6", "5"])));
        assert!(collector.accept(&mc("addition", "12 + 9 =", &["21", "20", "22", "19"])));
    }

    #[test]
    fn collector_without_threshold_only_checks_signatures() {
        let mut collector = UniqueCollector::new(None, 400);

        assert!(collector.accept(&mc("addition", "3 + 4 =", &["7", "6"])));
        assert!(collector.accept(&mc("addition", "4 + 3 =", &["7", "6"])));
        assert!(!collector.accept(&mc("addition", "3 + 4 =", &["6", "7"])));
    }

    #[test]
    fn window_limits_similarity_history() {
        let mut collector = UniqueCollector::new(Some(0.72), 1);

        assert!(collector.accept(&mc("a", "röd blå grön", &["x"])));
        assert!(collector.accept(&mc("a", "sol måne stjärna", &["y"])));
        assert!(collector.accept(&mc("a", "röd blå grön", &["z"])));
    }

    #[test]
    fn seeded_signatures_are_rejected() {
        let existing = mc("geometri", "Hur många hörn har en kvadrat?", &["4", "3", "5", "2"]);
        let mut collector = UniqueCollector::new(None, 400);
        collector.seed([&existing]);

        assert_eq!(collector.len(), 1);
        assert!(!collector.accept_distinct(&existing));
    }
}
