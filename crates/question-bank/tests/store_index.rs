//! Bank storage and manifest rebuilding against a real directory.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use test_support::{file_exists, read_json, write_file};

use question_bank::builder::{GenerationOptions, MatematikRequest, extend_matematik};
use question_bank::index::{load_index, rebuild, write_index};
use question_bank::store::{BankFormat, backup, load_bank, write_bank};
use question_bank::{Bank, BankError, Item, Plan, Profile};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct Scratch {
    _guard: TempDir,
    dir: Utf8PathBuf,
}

#[fixture]
fn scratch() -> Scratch {
    let guard = TempDir::new().expect("create temporary directory");
    let dir = Utf8PathBuf::from_path_buf(guard.path().join("banks")).expect("utf-8 temp path");
    Scratch { _guard: guard, dir }
}

fn generated_bank() -> Bank {
    let mut bank = Bank::empty("matematik");
    bank.grade = Some(3);
    let request = MatematikRequest {
        plan: Plan::even(10),
        diagrams: 2,
        tables: 1,
        pies: 1,
        chances: 1,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    extend_matematik(
        &mut bank,
        &request,
        &Profile::default(),
        GenerationOptions::default(),
        &mut rng,
    )
    .expect("generation succeeds");
    bank
}

#[rstest]
fn written_banks_load_back_unchanged(scratch: Scratch) {
    let path = scratch.dir.join("matematik.ak3.json");
    let bank = generated_bank();

    write_bank(&path, &bank).expect("bank should be written");
    let loaded = load_bank(&path, "matematik").expect("bank should load");

    assert_eq!(loaded.format, BankFormat::Single);
    assert_eq!(loaded.skipped, 0);
    assert_eq!(loaded.bank, bank);
}

#[rstest]
fn missing_banks_load_empty(scratch: Scratch) {
    let loaded = load_bank(&scratch.dir.join("svenska.ak3.json"), "svenska").expect("load");

    assert_eq!(loaded.format, BankFormat::Missing);
    assert!(loaded.bank.items.is_empty());
}

#[rstest]
fn only_non_object_records_are_skipped(scratch: Scratch) {
    let path = scratch.dir.join("svenska.ak3.json");
    write_bank(&path, &Bank::empty("svenska")).expect("create directory");
    write_file(
        &path,
        r#"{"subject": "svenska", "items": [
            {"id": "sv-001", "q": "Vilket ord stavas rätt?", "options": ["själv", "sjelv"], "correct": 0},
            {"id": "sv-002", "type": "bar-max", "q": "Vilken stapel är högst?"},
            ["sv-003"]
        ]}"#,
    )
    .expect("write bank");

    let loaded = load_bank(&path, "svenska").expect("bank should load");

    let kinds: Vec<&str> = loaded.bank.items.iter().map(Item::type_name).collect();
    assert_eq!(kinds, ["mc", "bar-max"]);
    assert_eq!(loaded.skipped, 1);
}

#[rstest]
fn invalid_json_is_a_parse_error(scratch: Scratch) {
    let path = scratch.dir.join("matematik.ak3.json");
    write_bank(&path, &Bank::empty("matematik")).expect("create directory");
    write_file(&path, "{ not json").expect("write bank");

    let err = load_bank(&path, "matematik").expect_err("parse should fail");

    assert!(matches!(err, BankError::ParseError { .. }));
}

#[rstest]
fn backups_copy_the_previous_file(scratch: Scratch) {
    let path = scratch.dir.join("matematik.ak3.json");
    assert_eq!(backup(&path).expect("nothing to back up"), None);

    write_bank(&path, &generated_bank()).expect("bank should be written");
    let copy = backup(&path).expect("backup").expect("backup path");

    assert!(copy.as_str().ends_with("matematik.ak3.json.bak"));
    assert!(file_exists(&copy));
    assert_eq!(
        read_json(&copy).expect("backup JSON"),
        read_json(&path).expect("bank JSON")
    );
}

fn write_labelled(dir: &Utf8Path, file: &str, subject: &str, grade: u32) {
    let mut bank = Bank::empty(subject);
    bank.grade = Some(grade);
    write_bank(&dir.join(file), &bank).expect("bank should be written");
}

#[rstest]
fn rebuild_numbers_colliding_ids(scratch: Scratch) {
    write_labelled(&scratch.dir, "svenska.ak3.json", "svenska", 3);
    write_labelled(&scratch.dir, "extra.json", "svenska", 3);
    write_labelled(&scratch.dir, "matematik.ak3.json", "matematik", 3);
    write_file(&scratch.dir.join("notes.json"), r#"{"text": "ingen bank"}"#)
        .expect("write stray file");
    let now = Utc
        .with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("valid timestamp");

    let document = rebuild(&scratch.dir, now).expect("index should rebuild");
    write_index(&scratch.dir, &document).expect("index should be written");
    let reloaded = load_index(&scratch.dir).expect("index should load");

    let ids: Vec<&str> = reloaded.banks.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, ["sv-ak3-1", "ma-ak3", "sv-ak3-2"]);
    assert_eq!(reloaded.generated_at, Some(now));
    let first = reloaded.banks.first().expect("an entry");
    assert_eq!(first.label, "Svenska åk 3");
    assert_eq!(first.path, "/banks/extra.json");
}

#[rstest]
fn legacy_manifest_key_is_read(scratch: Scratch) {
    write_bank(&scratch.dir.join("svenska.ak3.json"), &Bank::empty("svenska"))
        .expect("create directory");
    write_file(
        &scratch.dir.join("index.json"),
        r#"{"entries": [{"id": "sv-ak3", "subject": "svenska", "grade": 3, "path": "/banks/svenska.ak3.json", "label": "Svenska åk 3"}]}"#,
    )
    .expect("write manifest");

    let document = load_index(&scratch.dir).expect("index should load");

    assert_eq!(document.banks.len(), 1);
}
