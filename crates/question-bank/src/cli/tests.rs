//! Unit tests for the shared command-line helpers.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeZone, Utc};
use clap::Parser;
use rand::RngCore;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::cli::augment::{self, AugmentArgs};
use crate::cli::banks_tool::{self, BanksToolArgs};
use crate::cli::create::CreateArgs;
use crate::cli::extend::ExtendArgs;
use crate::model::ItemKind;
use crate::store::{load_bank, write_bank};

struct Scratch {
    _guard: TempDir,
    dir: Utf8PathBuf,
}

#[fixture]
fn scratch() -> Scratch {
    let guard = TempDir::new().expect("create temporary directory");
    let dir = Utf8PathBuf::from_path_buf(guard.path().to_path_buf()).expect("utf-8 temp path");
    Scratch { _guard: guard, dir }
}

fn division(prompt: &str) -> Item {
    Item::new(
        "division",
        prompt,
        ItemKind::Mc {
            options: vec!["4".to_owned(), "9".to_owned()],
            correct: 0,
        },
    )
}

#[rstest]
#[case(Toggle::Yes, true)]
#[case(Toggle::No, false)]
fn toggles_report_their_state(#[case] toggle: Toggle, #[case] enabled: bool) {
    assert_eq!(toggle.enabled(), enabled);
}

#[rstest]
fn guard_off_disables_similarity_filter() {
    let generation = GenerationArgs {
        unique_guard: Toggle::No,
        min_diff: Some(0.9),
        ..GenerationArgs::default()
    };

    let options = generation
        .options(&BankSettings::default())
        .expect("options should resolve");

    assert_eq!(options.min_diff, None);
}

#[rstest]
fn flag_threshold_beats_settings() {
    let settings = BankSettings {
        min_diff: Some(0.4),
        ..BankSettings::default()
    };
    let generation = GenerationArgs {
        min_diff: Some(0.7),
        ..GenerationArgs::default()
    };

    let options = generation.options(&settings).expect("options should resolve");

    assert_eq!(options.min_diff, Some(0.7));
}

#[rstest]
fn out_of_range_threshold_is_a_settings_error() {
    let generation = GenerationArgs {
        min_diff: Some(1.5),
        ..GenerationArgs::default()
    };

    let err = generation
        .options(&BankSettings::default())
        .expect_err("threshold above 1 should fail");

    assert!(matches!(err, CliError::ConfigError { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[rstest]
fn seeded_rng_is_reproducible() {
    let generation = GenerationArgs {
        seed: Some(42),
        ..GenerationArgs::default()
    };

    let (first_seed, mut first) = generation.rng();
    let (second_seed, mut second) = generation.rng();

    assert_eq!(first_seed, 42);
    assert_eq!(second_seed, 42);
    assert_eq!(first.next_u64(), second.next_u64());
}

#[rstest]
fn allow_nine_reaches_the_profile() {
    let generation = GenerationArgs {
        allow_nine: Toggle::Yes,
        max_dividend: Some(40),
        ..GenerationArgs::default()
    };

    let profile = generation.profile();

    assert!(profile.allow_nine);
    assert!(profile.max_dividend <= 40);
}

#[rstest]
#[case(Subject::Svenska, 3, "public/banks/svenska.ak3.json")]
#[case(Subject::Matematik, 4, "public/banks/matematik.ak4.json")]
fn bank_paths_follow_the_naming_scheme(
    #[case] subject: Subject,
    #[case] grade: u32,
    #[case] expected: &str,
) {
    let path = default_bank_path(Utf8Path::new("public/banks"), subject, grade);
    assert_eq!(path.as_str(), expected);
}

#[rstest]
fn banks_dir_flag_wins_over_settings() {
    let settings = BankSettings {
        banks_dir: Some("/srv/banks".into()),
        ..BankSettings::default()
    };

    let flagged = banks_dir(Some(Utf8Path::new("local/banks")), &settings).expect("flag path");
    let configured = banks_dir(None, &settings).expect("settings path");

    assert_eq!(flagged.as_str(), "local/banks");
    assert_eq!(configured.as_str(), "/srv/banks");
}

#[rstest]
fn run_summary_mentions_shortfalls() {
    let generated = Generated {
        seed: 9,
        report: GenerationReport {
            requested: 10,
            added_items: 8,
            added_passages: 0,
            rejected: 5,
            shortfalls: BTreeMap::from([("grammatik".to_owned(), 2)]),
            next_item_id: "sv-009".to_owned(),
            next_passage_id: None,
        },
    };

    let text = describe_run(&generated);

    assert!(text.starts_with("added 8 item(s) and 0 passage(s) of 10 requested"));
    assert!(text.contains("5 duplicate(s) rejected (seed 9)"));
    assert!(text.ends_with("short by 2: grammatik=2"), "{text}");
}

#[rstest]
fn preview_is_limited() {
    let mut bank = Bank::empty("matematik");
    let counts = ContentCounts {
        items: 6,
        plan: None,
        dnd: 0,
        passages: 0,
        diagrams: 0,
        tables: 0,
        pies: 0,
        chances: 0,
    };
    let generation = GenerationArgs {
        seed: Some(4),
        ..GenerationArgs::default()
    };
    generate(
        &mut bank,
        Subject::Matematik,
        &counts,
        &generation,
        &BankSettings::default(),
    )
    .expect("generation should succeed");

    let shown: serde_json::Value =
        serde_json::from_str(&preview(&bank, 1).expect("preview")).expect("preview is JSON");

    assert_eq!(shown.as_array().map(Vec::len), Some(PREVIEW_ITEMS));
    assert_eq!(
        shown.pointer("/0/id").and_then(serde_json::Value::as_str),
        Some("ma-002")
    );
}

#[rstest]
fn create_defaults_match_the_documented_counts() {
    let args = CreateArgs::try_parse_from(["create-bank", "--subject", "svenska"])
        .expect("arguments should parse");

    assert_eq!(args.grade, 3);
    assert_eq!(args.items, 120);
    assert_eq!(args.dnd, 8);
    assert_eq!(args.passages, 6);
    assert_eq!(args.diagrams, 16);
    assert!(!args.dry);
    assert_eq!(args.generation, GenerationArgs::default());
}

#[rstest]
#[case("svenska", 100)]
#[case("matematik", 200)]
fn extend_item_defaults_depend_on_subject(#[case] subject: &str, #[case] expected: usize) {
    let args = ExtendArgs::try_parse_from(["extend-bank", "--subject", subject])
        .expect("arguments should parse");

    assert_eq!(args.item_count(), expected);
}

#[rstest]
fn unknown_level_is_rejected_by_the_parser() {
    let parsed =
        CreateArgs::try_parse_from(["create-bank", "--subject", "svenska", "--level", "expert"]);
    assert!(parsed.is_err());
}

#[rstest]
fn augment_retunes_division_and_adds_charts(scratch: Scratch) {
    let path = scratch.dir.join("matematik.ak3.json");
    let mut bank = Bank::empty("matematik");
    bank.items.extend([division("12 ÷ 3 ="), division("81 ÷ 9 =")]);
    for (position, item) in bank.items.iter_mut().enumerate() {
        item.id = format!("ma-00{}", position + 1);
    }
    write_bank(&path, &bank).expect("bank should be written");
    let args = AugmentArgs::try_parse_from([
        "augment-bank",
        "--bank",
        path.as_str(),
        "--add-diagrams",
        "2",
        "--seed",
        "3",
    ])
    .expect("arguments should parse");

    let outcome = augment::run(&args, &BankSettings::default()).expect("augment should succeed");
    let written = load_bank(&path, "matematik").expect("bank should load").bank;

    assert_eq!(outcome.removed, 1);
    assert_eq!(written, outcome.bank);
    assert_eq!(written.items.first().map(|item| item.id.as_str()), Some("ma-001"));
    let charts: Vec<&str> = written.items.iter().skip(1).map(Item::type_name).collect();
    assert_eq!(charts, ["bar-max", "bar-compare"]);
    assert!(augment::message(&outcome).starts_with("division retune removed 1 item(s)"));
}

#[rstest]
fn augment_keeps_a_legacy_document_and_backs_it_up(scratch: Scratch) {
    let path = scratch.dir.join("matematik.json");
    let svenska = serde_json::json!({
        "items": [{"id": "sv-001", "q": "Vilket ord stavas rätt?", "options": ["själv", "sjelv"], "correct": 0}]
    });
    let legacy = serde_json::json!({
        "bankVersion": "1.0",
        "svenska": svenska.clone(),
        "matematik": {"items": [{"id": "ma-001", "q": "12 ÷ 3 =", "options": ["4", "9"], "correct": 0}]}
    });
    crate::store::write_json(&path, &legacy).expect("legacy bank should be written");
    let args = AugmentArgs::try_parse_from([
        "augment-bank",
        "--bank",
        path.as_str(),
        "--add-diagrams",
        "1",
        "--seed",
        "8",
    ])
    .expect("arguments should parse");

    let outcome = augment::run(&args, &BankSettings::default()).expect("augment should succeed");
    let written = crate::store::read_json_value(&path).expect("bank JSON");

    assert_eq!(written.get("svenska"), Some(&svenska));
    assert!(written.get("subject").is_none());
    let maths = written
        .pointer("/matematik/items")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len);
    assert_eq!(maths, Some(outcome.bank.items.len()));
    let saved = outcome.backup.clone().expect("backup path");
    assert_eq!(
        crate::store::read_json_value(&saved).expect("backup JSON"),
        legacy
    );
    assert!(augment::message(&outcome).contains("backup: "));
}

#[rstest]
fn augment_requires_an_existing_bank(scratch: Scratch) {
    let path = scratch.dir.join("saknas.json");
    let args = AugmentArgs::try_parse_from(["augment-bank", "--bank", path.as_str()])
        .expect("arguments should parse");

    let err = augment::run(&args, &BankSettings::default()).expect_err("missing bank");

    assert_eq!(err, CliError::MissingFile { path });
    assert_eq!(err.exit_code(), 1);
}

#[rstest]
fn banks_tool_lists_each_bank(scratch: Scratch) {
    let mut bank = Bank::empty("svenska");
    bank.grade = Some(3);
    write_bank(&scratch.dir.join("svenska.ak3.json"), &bank).expect("bank should be written");
    let args =
        BanksToolArgs::try_parse_from(["banks-tool", "--banks-dir", scratch.dir.as_str(), "list"])
            .expect("arguments should parse");
    let now = Utc
        .with_ymd_and_hms(2026, 10, 19, 7, 0, 0)
        .single()
        .expect("valid timestamp");

    let output = banks_tool::run(&args, &BankSettings::default(), now).expect("list succeeds");

    assert_eq!(output, "- svenska.ak3.json (svenska, åk 3): items=0, passages=0");
}
