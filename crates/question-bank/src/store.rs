//! Reading and writing bank documents.
//!
//! Banks are read through a raw [`serde_json::Value`] so that individual
//! records that fail to deserialise can be skipped instead of rejecting the
//! whole file. Legacy two-subject documents are reduced to the section for
//! the requested subject; the rest of the document is kept in
//! [`LoadedBank::siblings`] so [`write_in_format`] can put it back.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::atomic_io::write_atomic;
use crate::error::BankError;
use crate::model::{Bank, DEFAULT_BANK_VERSION, Item, Passage};

/// Suffix appended to the file name of a backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Shape of the document a bank was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    /// The file did not exist.
    Missing,
    /// A single-subject document.
    Single,
    /// A legacy document keyed by subject name.
    Legacy,
}

/// A bank together with what was learned while loading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBank {
    /// The structured bank.
    pub bank: Bank,
    /// Shape of the source document.
    pub format: BankFormat,
    /// Items and passages that could not be deserialised.
    pub skipped: usize,
    /// Top-level entries of a legacy document other than the loaded
    /// subject's section; empty for every other format.
    pub siblings: Map<String, Value>,
}

impl LoadedBank {
    fn missing(subject: &str) -> Self {
        Self {
            bank: Bank::empty(subject),
            format: BankFormat::Missing,
            skipped: 0,
            siblings: Map::new(),
        }
    }
}

/// Top-level keys of a single-subject document that [`Bank`] models.
const BANK_KEYS: &[&str] = &[
    "version",
    "bankVersion",
    "subject",
    "grade",
    "label",
    "description",
    "items",
    "passages",
];

/// Loads a bank, returning an empty one when the file does not exist.
///
/// # Errors
///
/// Returns [`BankError::ReadError`] when the file exists but cannot be read
/// and [`BankError::ParseError`] when it is not a JSON object.
pub fn load_bank(path: &Utf8Path, subject: &str) -> Result<LoadedBank, BankError> {
    match read_json_value(path) {
        Ok(value) => bank_from_value(path, value, subject),
        Err(BankError::NotFound { .. }) => Ok(LoadedBank::missing(subject)),
        Err(err) => Err(err),
    }
}

/// Loads a bank, logging a warning and starting empty when the file is
/// unreadable or malformed.
#[must_use]
pub fn load_bank_or_empty(path: &Utf8Path, subject: &str) -> LoadedBank {
    load_bank(path, subject).unwrap_or_else(|err| {
        warn!(path = %path, error = %err, "starting from an empty bank");
        LoadedBank::missing(subject)
    })
}

/// Reads a file as raw JSON.
///
/// # Errors
///
/// Returns [`BankError::NotFound`] for a missing file,
/// [`BankError::ReadError`] for other I/O failures and
/// [`BankError::ParseError`] for invalid JSON.
pub fn read_json_value(path: &Utf8Path) -> Result<Value, BankError> {
    let not_found = || BankError::NotFound {
        path: path.to_path_buf(),
    };
    let dir = match open_parent_dir(path) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(read_error(path, &err)),
    };
    let file_name = path.file_name().ok_or_else(not_found)?;
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(read_error(path, &err)),
    };
    serde_json::from_str(&contents).map_err(|err| BankError::ParseError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Converts a raw document into a bank for `subject`.
///
/// # Errors
///
/// Returns [`BankError::ParseError`] when the document is not an object.
pub fn bank_from_value(
    path: &Utf8Path,
    value: Value,
    subject: &str,
) -> Result<LoadedBank, BankError> {
    let Value::Object(mut root) = value else {
        return Err(BankError::ParseError {
            path: path.to_path_buf(),
            message: "bank document must be a JSON object".to_owned(),
        });
    };

    let is_legacy = !root.contains_key("items")
        && !root.contains_key("subject")
        && root.get(subject).is_some_and(Value::is_object);
    let version = string_field(&root, "version")
        .or_else(|| string_field(&root, "bankVersion"))
        .unwrap_or_else(|| DEFAULT_BANK_VERSION.to_owned());

    let mut bank = Bank::empty(subject);
    bank.version = version;
    let (mut section, siblings) = if is_legacy {
        let own = match root.remove(subject) {
            Some(Value::Object(own)) => own,
            _ => Map::new(),
        };
        (own, root)
    } else {
        if let Some(name) = string_field(&root, "subject").filter(|name| !name.trim().is_empty()) {
            bank.subject = name;
        }
        bank.grade = root
            .get("grade")
            .and_then(Value::as_u64)
            .and_then(|grade| u32::try_from(grade).ok());
        bank.label = string_field(&root, "label");
        bank.description = string_field(&root, "description");
        (root, Map::new())
    };

    let mut skipped = 0;
    bank.items = collect_records::<Item>(path, section.remove("items"), "items", &mut skipped);
    bank.passages =
        collect_records::<Passage>(path, section.remove("passages"), "passages", &mut skipped);
    if !is_legacy {
        section.retain(|key, _| !BANK_KEYS.contains(&key.as_str()));
    }
    bank.extra = section;

    Ok(LoadedBank {
        bank,
        format: if is_legacy {
            BankFormat::Legacy
        } else {
            BankFormat::Single
        },
        skipped,
        siblings,
    })
}

fn collect_records<T: DeserializeOwned>(
    path: &Utf8Path,
    records: Option<Value>,
    key: &str,
    skipped: &mut usize,
) -> Vec<T> {
    let Some(Value::Array(records)) = records else {
        return Vec::new();
    };
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value(raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(path = %path, key, index, error = %err, "skipping unreadable record");
                *skipped += 1;
                None
            }
        })
        .collect()
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

/// Renders a document as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`BankError::SerializeError`] if serialisation fails.
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<String, BankError> {
    let mut rendered =
        serde_json::to_string_pretty(document).map_err(|err| BankError::SerializeError {
            message: err.to_string(),
        })?;
    rendered.push('\n');
    Ok(rendered)
}

fn to_json_value<T: Serialize>(document: &T) -> Result<Value, BankError> {
    serde_json::to_value(document).map_err(|err| BankError::SerializeError {
        message: err.to_string(),
    })
}

/// Writes any serialisable document atomically, creating parent directories.
///
/// # Errors
///
/// Returns [`BankError`] if serialisation or the write fails.
pub fn write_json<T: Serialize>(path: &Utf8Path, document: &T) -> Result<(), BankError> {
    let rendered = to_pretty_json(document)?;
    let dir = create_parent_dir(path)?;
    write_atomic(&dir, path, &rendered)
}

/// Writes a bank atomically.
///
/// # Errors
///
/// Returns [`BankError`] if serialisation or the write fails.
pub fn write_bank(path: &Utf8Path, bank: &Bank) -> Result<(), BankError> {
    write_json(path, bank)
}

/// Writes a bank back in the shape it was loaded from.
///
/// A legacy document keeps its other subject sections and top-level keys;
/// only the section named by `bank.subject` is replaced. Any other format is
/// written as a single-subject document.
///
/// # Errors
///
/// Returns [`BankError`] if serialisation or the write fails.
pub fn write_in_format(
    path: &Utf8Path,
    bank: &Bank,
    format: BankFormat,
    siblings: &Map<String, Value>,
) -> Result<(), BankError> {
    match format {
        BankFormat::Legacy => write_json(path, &legacy_document(bank, siblings)?),
        BankFormat::Missing | BankFormat::Single => write_bank(path, bank),
    }
}

/// Builds a legacy two-subject document with `bank` as its subject section.
///
/// # Errors
///
/// Returns [`BankError::SerializeError`] if the records cannot be rendered.
pub fn legacy_document(bank: &Bank, siblings: &Map<String, Value>) -> Result<Value, BankError> {
    let mut section = Map::new();
    section.insert("items".to_owned(), to_json_value(&bank.items)?);
    section.insert("passages".to_owned(), to_json_value(&bank.passages)?);
    section.extend(bank.extra.clone());
    let mut root = siblings.clone();
    root.insert(bank.subject.clone(), Value::Object(section));
    Ok(Value::Object(root))
}

/// Copies an existing file to `<name>.bak` next to it.
///
/// Returns the backup path, or `None` when there was nothing to back up.
///
/// # Errors
///
/// Returns [`BankError::WriteError`] if the copy fails.
pub fn backup(path: &Utf8Path) -> Result<Option<Utf8PathBuf>, BankError> {
    let Some(file_name) = path.file_name() else {
        return Ok(None);
    };
    let Ok(dir) = open_parent_dir(path) else {
        return Ok(None);
    };
    if !dir.exists(file_name) {
        return Ok(None);
    }
    let backup_name = format!("{file_name}{BACKUP_SUFFIX}");
    let backup_path = path.with_file_name(&backup_name);
    dir.copy(file_name, &dir, &backup_name)
        .map_err(|err| BankError::WriteError {
            path: backup_path.clone(),
            message: err.to_string(),
        })?;
    Ok(Some(backup_path))
}

/// Opens the directory containing `path`.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn open_parent_dir(path: &Utf8Path) -> io::Result<Dir> {
    Dir::open_ambient_dir(parent_of(path), ambient_authority())
}

fn create_parent_dir(path: &Utf8Path) -> Result<Dir, BankError> {
    let parent = parent_of(path);
    let write_error = |err: io::Error| BankError::WriteError {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(write_error)?;
    Dir::open_ambient_dir(parent, ambient_authority()).map_err(write_error)
}

fn parent_of(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

fn read_error(path: &Utf8Path, err: &io::Error) -> BankError {
    BankError::ReadError {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
