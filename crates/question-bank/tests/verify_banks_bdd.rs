//! Behavioural tests for the `verify-banks` tool.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use clap::Parser;
use test_support::{unique_temp_dir, write_file};

use question_bank::cli::CliError;
use question_bank::cli::create::{self, CreateArgs};
use question_bank::cli::verify::{self, VerifyArgs};
use question_bank::config::BankSettings;
use question_bank::index::{rebuild, write_index};
use question_bank::validation::Verification;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

const BROKEN_BANK: &str = r#"{
  "version": "1.0",
  "subject": "matematik",
  "grade": 3,
  "items": [
    {"id": "ma-001", "type": "mc", "q": "7 + 5 =", "options": ["12", "13"], "correct": 4, "hint": "Gör tiotal.", "explain": "7 + 3 = 10 och 10 + 2 = 12."}
  ]
}"#;

#[derive(Default, ScenarioState)]
struct World {
    banks_dir: Slot<Utf8PathBuf>,
    outcome: Slot<Result<Verification, CliError>>,
}

impl World {
    fn dir(&self) -> Utf8PathBuf {
        self.banks_dir.get().expect("banks directory should be set")
    }

    fn verification(&self) -> Verification {
        self.outcome
            .get()
            .expect("verify-banks should have run")
            .expect("verification should complete")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn fresh_dir(world: &World) -> Utf8PathBuf {
    let dir = unique_temp_dir("verify-banks").expect("create banks directory");
    world.banks_dir.set(dir.clone());
    dir
}

#[given("an indexed bank generated with seed {seed:u64}")]
fn an_indexed_generated_bank(world: &World, seed: u64) {
    let dir = fresh_dir(world);
    let seed_text = seed.to_string();
    let args = CreateArgs::try_parse_from([
        "create-bank",
        "--subject",
        "svenska",
        "--banks-dir",
        dir.as_str(),
        "--seed",
        &seed_text,
        "--items",
        "16",
        "--dnd",
        "2",
        "--passages",
        "2",
        "--update-index",
    ])
    .expect("arguments should parse");
    let now = Utc
        .with_ymd_and_hms(2026, 10, 19, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    create::run(&args, &BankSettings::default(), now).expect("create-bank should succeed");
}

#[given("an indexed bank with an answer out of range")]
fn an_indexed_bank_with_an_answer_out_of_range(world: &World) {
    let dir = fresh_dir(world);
    write_file(&dir.join("matematik.ak3.json"), BROKEN_BANK).expect("write bank");
    let now = Utc
        .with_ymd_and_hms(2026, 10, 19, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    let document = rebuild(&dir, now).expect("index should rebuild");
    write_index(&dir, &document).expect("index should be written");
}

#[given("a banks directory with legacy Swedish and mathematics files")]
fn a_banks_directory_with_legacy_files(world: &World) {
    let dir = fresh_dir(world);
    write_file(
        &dir.join("svenska.json"),
        r#"{"svenska": {"items": [{"id": "sv-001", "q": "Vilket ord stavas rätt?", "options": ["själv", "sjelv"], "correct": 0, "hint": "Lyssna.", "explain": "Själv stavas med sj."}], "passages": []}}"#,
    )
    .expect("write svenska.json");
    write_file(
        &dir.join("matematik.json"),
        r#"{"matematik": {"items": [{"id": "ma-001", "q": "2 + 2 =", "options": ["4", "5"], "correct": 0, "hint": "Dubbla.", "explain": "2 + 2 = 4."}]}}"#,
    )
    .expect("write matematik.json");
}

#[when("verify-banks runs")]
fn verify_banks_runs(world: &World) {
    let dir = world.dir();
    let args = VerifyArgs::try_parse_from(["verify-banks", "--banks-dir", dir.as_str()])
        .expect("arguments should parse");
    world.outcome.set(verify::run(&args, &BankSettings::default()));
}

#[then("verification passes")]
fn verification_passes(world: &World) {
    let verification = world.verification();
    let report = verify::render(&verification);

    assert!(verification.passed(), "{report}");
    assert_eq!(verification.reports.len(), 1);
    assert!(verify::ensure_passed(&verification).is_ok());
    assert!(report.starts_with("checking index.json"), "{report}");
}

#[then("verification fails with {count:usize} critical problem")]
fn verification_fails_with_critical_problems(world: &World, count: usize) {
    let verification = world.verification();

    assert!(!verification.passed());
    assert_eq!(verification.critical(), count);
    assert!(verify::render(&verification).contains("error: ma-001: correct is outside [0, 1]"));
}

#[then("the command fails with exit code {code:u32}")]
fn the_command_fails_with_exit_code(world: &World, code: u32) {
    let err = verify::ensure_passed(&world.verification()).expect_err("verification should fail");
    assert_eq!(u32::from(err.exit_code()), code);
}

#[then("the report checked \"{source}\"")]
fn the_report_checked(world: &World, source: String) {
    let verification = world.verification();
    let report = verify::render(&verification);

    assert!(report.starts_with(&format!("checking {source}")), "{report}");
    assert_eq!(verification.reports.len(), 2);
    assert!(report.ends_with("ok: 0 critical, 0 warning(s)"), "{report}");
}

#[scenario(path = "tests/features/verify_banks.feature", index = 0)]
fn generated_bank_passes(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/verify_banks.feature", index = 1)]
fn broken_bank_fails(world: World) {
    drop(world);
}

#[scenario(path = "tests/features/verify_banks.feature", index = 2)]
fn legacy_files_are_checked_without_an_index(world: World) {
    drop(world);
}
