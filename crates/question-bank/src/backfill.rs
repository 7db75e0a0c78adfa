//! Default filling for banks written by the tools.
//!
//! Items produced by older scripts or edited by hand may lack labels, help
//! texts or a usable `correct` index. [`backfill`] repairs those fields in
//! place so the application never sees a half-populated record.

use crate::model::{Bank, Bucket, ItemKind, PassageQuestion};

/// Difficulty assigned when an item carries none.
pub const DEFAULT_DIFFICULTY: &str = "np";
/// Hint used when an item has neither hint nor explanation.
pub const GENERIC_HINT: &str = "Titta noga på frågan och alternativen.";
/// Hint and explanation used for passage questions without one.
pub const READING_HINT: &str = "Läs texten noga och matcha nyckelord.";

/// Counts of what [`backfill`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Records whose `correct` index was reset to 0.
    pub corrected: usize,
    /// Records that received at least one default field.
    pub filled: usize,
}

/// Fills missing defaults and resets out-of-range answers throughout `bank`.
///
/// # Examples
///
/// ```
/// use question_bank::{Bank, Item, ItemKind, backfill};
///
/// let mut bank = Bank::empty("svenska");
/// bank.items.push(Item::new(
///     "stavning",
///     "Vilket ord stavas rätt?",
///     ItemKind::Mc { options: vec!["själv".into(), "sjelv".into()], correct: 7 },
/// ));
///
/// let summary = backfill(&mut bank);
///
/// assert_eq!(summary.corrected, 1);
/// assert_eq!(bank.items[0].topic.as_deref(), Some("svenska"));
/// ```
pub fn backfill(bank: &mut Bank) -> BackfillSummary {
    let mut summary = BackfillSummary::default();
    let subject = bank.subject.clone();

    for item in &mut bank.items {
        let mut touched = fill_labels(&mut item.topic, &mut item.difficulty, &subject);
        if item.hint.is_none() {
            item.hint = Some(item.explain.clone().unwrap_or_else(|| GENERIC_HINT.to_owned()));
            touched = true;
        }
        if item.explain.is_none() {
            item.explain.clone_from(&item.hint);
            touched = true;
        }
        match &mut item.kind {
            ItemKind::Mc { options, correct }
            | ItemKind::BarMax {
                options, correct, ..
            }
            | ItemKind::BarCompare {
                options, correct, ..
            } => {
                if reset_correct(options.len(), correct) {
                    summary.corrected += 1;
                }
            }
            ItemKind::Dnd {
                buckets,
                tiles,
                solution,
            } => touched |= fill_dnd(buckets, tiles, solution),
            ItemKind::TableFill { .. }
            | ItemKind::PieAssign { .. }
            | ItemKind::ChanceMatrix { .. }
            | ItemKind::Other(_) => {}
        }
        if touched {
            summary.filled += 1;
        }
    }

    for question in bank.passages.iter_mut().flat_map(|passage| &mut passage.questions) {
        if fill_question(question, &subject) {
            summary.filled += 1;
        }
        if reset_correct(question.options.len(), &mut question.correct) {
            summary.corrected += 1;
        }
    }
    summary
}

fn fill_labels(topic: &mut Option<String>, difficulty: &mut Option<String>, subject: &str) -> bool {
    let mut touched = false;
    if topic.is_none() {
        *topic = Some(subject.to_owned());
        touched = true;
    }
    if difficulty.is_none() {
        *difficulty = Some(DEFAULT_DIFFICULTY.to_owned());
        touched = true;
    }
    touched
}

fn fill_question(question: &mut PassageQuestion, subject: &str) -> bool {
    let mut touched = fill_labels(&mut question.topic, &mut question.difficulty, subject);
    for field in [&mut question.hint, &mut question.explain] {
        if field.is_none() {
            *field = Some(READING_HINT.to_owned());
            touched = true;
        }
    }
    touched
}

/// Resets `correct` to 0 when it does not index one of at least two options.
const fn reset_correct(len: usize, correct: &mut usize) -> bool {
    if len >= 2 && *correct >= len {
        *correct = 0;
        return true;
    }
    false
}

fn fill_dnd(
    buckets: &mut Vec<Bucket>,
    tiles: &[String],
    solution: &mut std::collections::BTreeMap<String, String>,
) -> bool {
    let mut touched = false;
    if buckets.is_empty() {
        *buckets = vec![Bucket::new("A"), Bucket::new("B")];
        touched = true;
    }
    if solution.is_empty()
        && let Some(first) = buckets.first()
    {
        for tile in tiles {
            solution.insert(tile.clone(), first.label.clone());
        }
        touched = !tiles.is_empty() || touched;
    }
    touched
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::*;
    use crate::model::{Item, Passage};

    fn mc(correct: usize) -> Item {
        Item::new(
            "addition",
            "3 + 4 =",
            ItemKind::Mc {
                options: vec!["7".to_owned(), "8".to_owned(), "6".to_owned()],
                correct,
            },
        )
    }

    #[rstest]
    #[case(1, 1, 0)]
    #[case(3, 0, 1)]
    #[case(99, 0, 1)]
    fn correct_index_is_reset_only_when_out_of_range(
        #[case] correct: usize,
        #[case] expected: usize,
        #[case] corrected: usize,
    ) {
        let mut bank = Bank::empty("matematik");
        bank.items.push(mc(correct));

        let summary = backfill(&mut bank);

        assert_eq!(bank.items.first().and_then(Item::choice).map(|(_, c)| c), Some(expected));
        assert_eq!(summary.corrected, corrected);
    }

    #[test]
    fn labels_and_help_default_from_the_bank() {
        let mut bank = Bank::empty("matematik");
        let mut item = mc(0);
        item.explain = Some("3 + 4 = 7".to_owned());
        bank.items.push(item);
        bank.items.push(mc(0));

        backfill(&mut bank);

        let first = bank.items.first().expect("item");
        assert_eq!(first.topic.as_deref(), Some("matematik"));
        assert_eq!(first.difficulty.as_deref(), Some(DEFAULT_DIFFICULTY));
        assert_eq!(first.hint.as_deref(), Some("3 + 4 = 7"));
        let second = bank.items.get(1).expect("item");
        assert_eq!(second.hint.as_deref(), Some(GENERIC_HINT));
        assert_eq!(second.explain.as_deref(), Some(GENERIC_HINT));
    }

    #[test]
    fn bare_dnd_items_get_buckets_and_a_neutral_solution() {
        let mut bank = Bank::empty("svenska");
        bank.items.push(Item::new(
            "grammatik",
            "Dra orden.",
            ItemKind::Dnd {
                buckets: Vec::new(),
                tiles: vec!["katt".to_owned(), "springer".to_owned()],
                solution: BTreeMap::new(),
            },
        ));

        backfill(&mut bank);

        let ItemKind::Dnd {
            buckets, solution, ..
        } = &bank.items.first().expect("item").kind
        else {
            panic!("expected dnd");
        };
        assert_eq!(buckets, &vec![Bucket::new("A"), Bucket::new("B")]);
        assert_eq!(solution.get("katt").map(String::as_str), Some("A"));
        assert_eq!(solution.get("springer").map(String::as_str), Some("A"));
    }

    #[test]
    fn passage_questions_get_reading_help() {
        let mut bank = Bank::empty("svenska");
        bank.passages.push(Passage {
            id: "sv-p-001".to_owned(),
            title: "Lisa".to_owned(),
            text: "Lisa var i parken.".to_owned(),
            questions: vec![PassageQuestion {
                id: "sv-p-001-q1".to_owned(),
                q: "Var var Lisa?".to_owned(),
                options: vec!["parken".to_owned(), "skolan".to_owned()],
                correct: 5,
                hint: None,
                explain: None,
                topic: None,
                difficulty: Some("hard".to_owned()),
                extra: serde_json::Map::new(),
            }],
            extra: serde_json::Map::new(),
        });

        let summary = backfill(&mut bank);

        let question = bank
            .passages
            .first()
            .and_then(|passage| passage.questions.first())
            .expect("question");
        assert_eq!(question.correct, 0);
        assert_eq!(question.hint.as_deref(), Some(READING_HINT));
        assert_eq!(question.difficulty.as_deref(), Some("hard"));
        assert_eq!(summary, BackfillSummary { corrected: 1, filled: 1 });
    }
}
