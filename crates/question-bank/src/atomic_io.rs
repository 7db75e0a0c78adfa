//! Crash-safe file replacement.
//!
//! Bank and index files are written to a hidden sibling first, synced, and
//! then renamed over the target so readers never observe a half-written
//! document.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8Path;
use cap_std::fs::{Dir, OpenOptions};

use crate::error::BankError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replaces `target` inside `dir` with `contents`.
///
/// `target` is the path shown in errors; only its file name is used to
/// address the file within `dir`.
pub(crate) fn write_atomic(dir: &Dir, target: &Utf8Path, contents: &str) -> Result<(), BankError> {
    let Some(file_name) = target.file_name() else {
        return Err(BankError::WriteError {
            path: target.to_path_buf(),
            message: "bank path must name a file".to_owned(),
        });
    };
    let tmp_name = temp_name(file_name);

    let staged = stage(dir, &tmp_name, contents).and_then(|()| publish(dir, &tmp_name, file_name));
    if let Err(err) = staged {
        discard(dir, &tmp_name);
        return Err(BankError::WriteError {
            path: target.to_path_buf(),
            message: err.to_string(),
        });
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(".{file_name}.{}.{nanos}.{counter}.tmp", std::process::id())
}

fn stage(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn publish(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    // Rename does not replace an existing file on Windows.
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, file_name)
}

#[cfg(not(windows))]
fn publish(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, file_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    if let Err(err) = dir.remove_file(tmp_name)
        && err.kind() != io::ErrorKind::NotFound
    {
        tracing::debug!(file = tmp_name, error = %err, "could not remove temporary file");
    }
}

fn sync_directory(dir: &Dir) {
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        tracing::debug!(error = %err, "directory sync skipped");
    }
}

#[cfg(test)]
mod tests {
    use cap_std::ambient_authority;

    use super::*;

    fn scratch() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        (tmp, dir)
    }

    #[test]
    fn replaces_existing_contents() {
        let (_tmp, dir) = scratch();
        let target = Utf8Path::new("banks/svenska.ak3.json");

        write_atomic(&dir, target, "first").expect("first write");
        write_atomic(&dir, target, "second").expect("second write");

        assert_eq!(dir.read_to_string("svenska.ak3.json").expect("read"), "second");
    }

    #[test]
    fn leaves_no_temporary_files_behind() {
        let (_tmp, dir) = scratch();

        write_atomic(&dir, Utf8Path::new("index.json"), "{}").expect("write");

        let names: Vec<String> = dir
            .entries()
            .expect("entries")
            .map(|entry| {
                entry
                    .expect("entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["index.json".to_owned()]);
    }

    #[test]
    fn rejects_paths_without_file_name() {
        let (_tmp, dir) = scratch();

        let err = write_atomic(&dir, Utf8Path::new(".."), "{}").expect_err("no file name");

        assert!(matches!(err, BankError::WriteError { .. }));
    }
}
