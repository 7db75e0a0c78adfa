//! The `index.json` manifest listing every bank in a banks directory.
//!
//! The manifest is rebuilt from the bank files themselves. Subject and grade
//! come from each document, falling back to file names of the form
//! `<subject>.ak<grade>.json`.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::BankError;
use crate::store::{read_json_value, write_json};

/// File name of the manifest inside a banks directory.
pub const INDEX_FILE: &str = "index.json";
/// Manifest format version.
pub const INDEX_VERSION: &str = "1.0";

const SUBJECT_CODES: &[(&str, &str)] = &[
    ("svenska", "sv"),
    ("matematik", "ma"),
    ("engelska", "en"),
    ("no", "no"),
    ("so", "so"),
    ("geografi", "geo"),
    ("historia", "his"),
    ("religion", "rel"),
    ("biologi", "bio"),
    ("fysik", "fy"),
    ("kemi", "ke"),
];

/// The manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    /// Manifest format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// When the manifest was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Registered banks; `entries` is accepted on read.
    #[serde(default, alias = "entries")]
    pub banks: Vec<IndexEntry>,
}

fn default_version() -> String {
    INDEX_VERSION.to_owned()
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            generated_at: None,
            banks: Vec::new(),
        }
    }
}

/// One registered bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Manifest-unique identifier such as `sv-ak3`.
    pub id: String,
    /// Lowercase subject name.
    pub subject: String,
    /// School grade, 0 when unknown.
    #[serde(default)]
    pub grade: u32,
    /// Site-root path such as `/banks/svenska.ak3.json`.
    pub path: String,
    /// Display name.
    #[serde(default)]
    pub label: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What a bank file declares about itself, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSummary {
    /// File name within the banks directory.
    pub file: String,
    /// Subject from the document or the file name.
    pub subject: Option<String>,
    /// Grade from the document or the file name.
    pub grade: Option<u32>,
    /// Number of items.
    pub items: usize,
    /// Number of passages.
    pub passages: usize,
}

/// Returns the short code used in manifest IDs.
///
/// # Examples
///
/// ```
/// use question_bank::index::subject_code;
///
/// assert_eq!(subject_code("Svenska"), "sv");
/// assert_eq!(subject_code("teknik"), "te");
/// assert_eq!(subject_code("?!"), "xx");
/// ```
#[must_use]
pub fn subject_code(subject: &str) -> String {
    let lowered = subject.trim().to_lowercase();
    if let Some((_, code)) = SUBJECT_CODES.iter().find(|(name, _)| *name == lowered) {
        return (*code).to_owned();
    }
    let code: String = lowered
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(2)
        .collect();
    if code.is_empty() { "xx".to_owned() } else { code }
}

/// Builds a display label such as `Svenska åk 3`.
#[must_use]
pub fn default_label(subject: &str, grade: Option<u32>) -> String {
    let mut chars = subject.trim().chars();
    let name: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
        .unwrap_or_default();
    grade.map_or_else(|| name.clone(), |year| format!("{name} åk {year}"))
}

/// Splits `svenska.ak3.json` into its subject and grade.
///
/// Only the final path component is considered.
#[must_use]
pub fn parse_ak_filename(path: &str) -> Option<(String, u32)> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = name.strip_suffix(".json")?;
    let (subject, rest) = stem.split_once('.')?;
    let digits = rest.strip_prefix("ak")?;
    if subject.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((subject.to_owned(), digits.parse().ok()?))
}

/// Lists the bank files of `dir`, sorted by name, excluding the manifest.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`BankError::ReadError`] when the directory cannot be listed.
pub fn list_bank_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, BankError> {
    let read_error = |err: io::Error| BankError::ReadError {
        path: dir.to_path_buf(),
        message: err.to_string(),
    };
    let handle = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(read_error(err)),
    };

    let mut files = Vec::new();
    for listed in handle.entries().map_err(read_error)? {
        let entry = listed.map_err(read_error)?;
        if !entry.file_type().map_err(read_error)?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!(dir = %dir, "skipping non-UTF-8 file name");
            continue;
        };
        if name.ends_with(".json") && name != INDEX_FILE {
            files.push(dir.join(name));
        }
    }
    files.sort();
    Ok(files)
}

/// Reads what a bank file says about itself.
///
/// # Errors
///
/// Returns [`BankError`] when the file cannot be read or parsed.
pub fn describe(path: &Utf8Path) -> Result<BankSummary, BankError> {
    let document = read_json_value(path)?;
    let (subject, grade) = bank_identity(path, &document);
    let count = |key: &str| document.get(key).and_then(Value::as_array).map_or(0, Vec::len);
    Ok(BankSummary {
        file: path.file_name().unwrap_or(path.as_str()).to_owned(),
        subject,
        grade,
        items: count("items"),
        passages: count("passages"),
    })
}

/// Returns the subject and grade a bank declares, filled in from a file name
/// of the form `<subject>.ak<grade>.json`.
#[must_use]
pub fn bank_identity(path: &Utf8Path, document: &Value) -> (Option<String>, Option<u32>) {
    let mut subject = document
        .get("subject")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(ToOwned::to_owned);
    let mut grade = document
        .get("grade")
        .and_then(Value::as_u64)
        .and_then(|grade| u32::try_from(grade).ok());
    if (subject.is_none() || grade.is_none())
        && let Some((file_subject, file_grade)) = parse_ak_filename(path.as_str())
    {
        subject = subject.or(Some(file_subject));
        grade = grade.or(Some(file_grade));
    }
    (subject, grade)
}

/// Builds a fresh manifest from the bank files in `dir`.
///
/// Unreadable files and files without a subject are skipped with a warning.
/// Colliding IDs are numbered `-1`, `-2`, … in file order.
///
/// # Errors
///
/// Returns [`BankError`] when the directory cannot be listed.
pub fn rebuild(dir: &Utf8Path, now: DateTime<Utc>) -> Result<IndexDocument, BankError> {
    let mut banks = Vec::new();
    for path in list_bank_files(dir)? {
        let document = match read_json_value(&path) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %path, error = %err, "skipping unreadable bank");
                continue;
            }
        };
        let (declared_subject, declared_grade) = bank_identity(&path, &document);
        let Some(subject) = declared_subject else {
            warn!(path = %path, "skipping bank without a subject");
            continue;
        };
        let grade = declared_grade.unwrap_or(0);
        let field = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
                .map(ToOwned::to_owned)
        };
        banks.push(IndexEntry {
            id: format!("{}-ak{grade}", subject_code(&subject)),
            label: field("label").unwrap_or_else(|| default_label(&subject, Some(grade))),
            description: field("description"),
            subject: subject.to_lowercase(),
            grade,
            path: site_path(dir, &path),
        });
    }
    disambiguate(&mut banks);
    Ok(IndexDocument {
        version: default_version(),
        generated_at: Some(now),
        banks,
    })
}

fn disambiguate(banks: &mut [IndexEntry]) {
    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    for bank in banks.iter() {
        *totals.entry(bank.id.clone()).or_default() += 1;
    }
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for bank in banks.iter_mut() {
        if totals.get(&bank.id).copied().unwrap_or(0) > 1 {
            let count = seen.entry(bank.id.clone()).or_default();
            *count += 1;
            bank.id = format!("{}-{count}", bank.id);
        }
    }
}

/// Returns the site-root path of `file`, such as `/banks/svenska.ak3.json`.
///
/// Files outside `dir` are listed by file name.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use question_bank::index::site_path;
///
/// let dir = Utf8Path::new("public/banks");
/// assert_eq!(site_path(dir, Utf8Path::new("public/banks/extra/sv.json")), "/banks/extra/sv.json");
/// assert_eq!(site_path(dir, Utf8Path::new("/tmp/ma.json")), "/banks/ma.json");
/// ```
#[must_use]
pub fn site_path(dir: &Utf8Path, file: &Utf8Path) -> String {
    let site_dir = dir.file_name().unwrap_or("banks");
    let within = file.strip_prefix(dir).map_or_else(
        |_| file.file_name().unwrap_or(file.as_str()),
        Utf8Path::as_str,
    );
    format!("/{site_dir}/{within}")
}

/// Replaces the entry with the same ID, or appends `entry`.
pub fn upsert(document: &mut IndexDocument, entry: IndexEntry) {
    match document.banks.iter_mut().find(|existing| existing.id == entry.id) {
        Some(existing) => *existing = entry,
        None => document.banks.push(entry),
    }
}

/// Loads the manifest of `dir`, or an empty one when none exists.
///
/// # Errors
///
/// Returns [`BankError`] when the manifest exists but is unreadable.
pub fn load_index(dir: &Utf8Path) -> Result<IndexDocument, BankError> {
    let path = dir.join(INDEX_FILE);
    match read_json_value(&path) {
        Ok(value) => serde_json::from_value(value).map_err(|err| BankError::ParseError {
            path,
            message: err.to_string(),
        }),
        Err(BankError::NotFound { .. }) => Ok(IndexDocument::default()),
        Err(err) => Err(err),
    }
}

/// Writes the manifest of `dir` atomically and returns its path.
///
/// # Errors
///
/// Returns [`BankError`] when the manifest cannot be written.
pub fn write_index(dir: &Utf8Path, document: &IndexDocument) -> Result<Utf8PathBuf, BankError> {
    let path = dir.join(INDEX_FILE);
    write_json(&path, document)?;
    Ok(path)
}

/// Maps a manifest path such as `/banks/x.json` onto a file in `dir`.
#[must_use]
pub fn resolve_entry_path(dir: &Utf8Path, entry_path: &str) -> Utf8PathBuf {
    let absolute = Utf8Path::new(entry_path);
    if absolute.is_absolute() && absolute.exists() {
        return absolute.to_path_buf();
    }
    let site_dir = dir.file_name().unwrap_or("banks");
    let rooted = entry_path.trim_start_matches('/');
    let relative = rooted.strip_prefix("public/").unwrap_or(rooted);
    let within = relative
        .strip_prefix(site_dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(relative);
    dir.join(within)
}
