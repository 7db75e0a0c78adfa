//! Properties every generated bank must hold, checked across seeds.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::BTreeSet;

use question_bank::builder::{
    GenerationOptions, MatematikRequest, SvenskaRequest, extend_matematik, extend_svenska,
};
use question_bank::validation::validate_document;
use question_bank::{
    Bank, IdAllocator, ItemKind, Plan, Profile, shuffle_with_correct, signature,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

fn svenska_bank(seed: u64) -> Bank {
    let mut bank = Bank::empty("svenska");
    let request = SvenskaRequest {
        plan: Plan::even(24),
        dnd: 3,
        passages: 3,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    extend_svenska(
        &mut bank,
        &request,
        &Profile::default(),
        GenerationOptions::default(),
        &mut rng,
    )
    .expect("svenska generation succeeds");
    bank
}

fn matematik_bank(seed: u64) -> Bank {
    let mut bank = Bank::empty("matematik");
    let request = MatematikRequest {
        plan: Plan::even(30),
        diagrams: 4,
        tables: 2,
        pies: 2,
        chances: 2,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    extend_matematik(
        &mut bank,
        &request,
        &Profile::default(),
        GenerationOptions::default(),
        &mut rng,
    )
    .expect("matematik generation succeeds");
    bank
}

fn number(id: &str) -> u64 {
    id.rsplit('-')
        .next()
        .and_then(|tail| tail.parse().ok())
        .expect("numeric id tail")
}

#[rstest]
#[case(1)]
#[case(17)]
#[case(2024)]
fn choice_answers_point_at_options(#[case] seed: u64) {
    for bank in [svenska_bank(seed), matematik_bank(seed)] {
        for item in &bank.items {
            if let Some((options, correct)) = item.choice() {
                assert!(correct < options.len(), "{}", item.id);
                let distinct: BTreeSet<&String> = options.iter().collect();
                assert_eq!(distinct.len(), options.len(), "{} repeats an option", item.id);
            }
        }
        for question in bank.passages.iter().flat_map(|passage| &passage.questions) {
            assert!(question.correct < question.options.len(), "{}", question.id);
        }
    }
}

#[rstest]
#[case(5)]
#[case(99)]
fn no_two_items_share_a_signature(#[case] seed: u64) {
    for bank in [svenska_bank(seed), matematik_bank(seed)] {
        let signatures: BTreeSet<String> = bank.items.iter().map(signature).collect();
        assert_eq!(signatures.len(), bank.items.len());
    }
}

#[rstest]
fn bar_max_answers_name_the_first_highest_bar() {
    let bank = matematik_bank(8);
    let charts: Vec<_> = bank
        .items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::BarMax {
                chart,
                options,
                correct,
            } => Some((chart, options, *correct)),
            _ => None,
        })
        .collect();

    assert!(!charts.is_empty());
    for (chart, options, correct) in charts {
        assert_eq!(options, &chart.labels);
        let highest = chart.values.iter().max().expect("values");
        let first = chart
            .values
            .iter()
            .position(|value| value == highest)
            .expect("highest bar");
        assert_eq!(correct, first);
    }
}

#[rstest]
fn appended_ids_keep_increasing() {
    let mut bank = svenska_bank(3);
    let before: Vec<String> = bank.items.iter().map(|item| item.id.clone()).collect();
    let highest = before.iter().map(|id| number(id)).max().expect("items");

    let request = SvenskaRequest {
        plan: Plan::even(8),
        dnd: 0,
        passages: 1,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let report = extend_svenska(
        &mut bank,
        &request,
        &Profile::default(),
        GenerationOptions::default(),
        &mut rng,
    )
    .expect("extension succeeds");

    let appended: Vec<u64> = bank
        .items
        .iter()
        .skip(before.len())
        .map(|item| number(&item.id))
        .collect();
    assert_eq!(appended.len(), report.added_items);
    assert!(appended.iter().all(|value| *value > highest));
    assert!(appended.windows(2).all(|pair| matches!(pair, [a, b] if a < b)));

    let all: Vec<&str> = bank.ids().collect();
    let distinct: BTreeSet<&str> = all.iter().copied().collect();
    assert_eq!(distinct.len(), all.len());
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(3)]
fn shuffling_keeps_options_and_tracks_the_answer(#[case] correct: usize) {
    let options = vec!["sol", "måne", "stjärna", "moln"];
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let answer = *options.get(correct).expect("case index in range");

    let (shuffled, position) =
        shuffle_with_correct(options.clone(), correct, &mut rng).expect("valid index");

    let mut sorted_before = options;
    let mut sorted_after = shuffled.clone();
    sorted_before.sort_unstable();
    sorted_after.sort_unstable();
    assert_eq!(sorted_before, sorted_after);
    assert_eq!(shuffled.get(position), Some(&answer));
}

#[rstest]
fn shuffling_rejects_an_out_of_range_answer() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(shuffle_with_correct(vec!["a", "b"], 2, &mut rng).is_err());
}

#[rstest]
fn allocator_continues_after_the_highest_numeric_id() {
    let mut ids = IdAllocator::scan(["sv-003", "sv-p-010", "sv-041", "sv-abc"], "sv-");
    assert_eq!(ids.next_id().as_deref(), Ok("sv-042"));
    assert_eq!(ids.next_id().as_deref(), Ok("sv-043"));
}

#[rstest]
#[case(6)]
#[case(31)]
fn generated_banks_have_no_critical_findings(#[case] seed: u64) {
    for bank in [svenska_bank(seed), matematik_bank(seed)] {
        let document = serde_json::to_value(&bank).expect("bank serialises");
        let report = validate_document(&bank.subject, &document);
        let critical: Vec<String> = report
            .issues
            .iter()
            .filter(|issue| issue.severity == question_bank::validation::Severity::Critical)
            .map(ToString::to_string)
            .collect();
        assert!(critical.is_empty(), "{critical:?}");
    }
}
