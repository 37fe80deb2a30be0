//! JSON file I/O for bug records.
//!
//! The data file is one pretty-printed JSON array holding the whole
//! collection. Saves replace the file atomically.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{BugtrackError, Result};
use crate::model::Record;

/// Load every record from a data file.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns `Io` if the file exists but cannot be read, or `Corrupt` if
/// its contents are not a valid record array.
pub fn load(path: &Path) -> Result<Option<Vec<Record>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BugtrackError::Io(e)),
    };

    let records: Vec<Record> = serde_json::from_str(&raw).map_err(|e| BugtrackError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    check_invariants(&records).map_err(|reason| BugtrackError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    tracing::debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(Some(records))
}

/// Save records to a data file with atomic write.
///
/// Writes to a sibling `.tmp` file, then renames it over `path`.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records)?;

    let tmp_path = sibling_path(path, ".tmp");
    let written = write_file(&tmp_path, json.as_bytes()).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(BugtrackError::Io(e));
    }

    tracing::debug!(path = %path.display(), count = records.len(), "Saved records");
    Ok(())
}

/// Copy a data file that failed to load to `<name>.corrupt` next to it.
///
/// Returns the backup path.
///
/// # Errors
///
/// Returns `Io` if the copy fails.
pub fn backup_corrupt(path: &Path) -> Result<PathBuf> {
    let backup = sibling_path(path, ".corrupt");
    fs::copy(path, &backup)?;
    tracing::debug!(path = %path.display(), backup = %backup.display(), "Backed up corrupt data file");
    Ok(backup)
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.flush()
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("bugs.json"), OsString::from);
    name.push(suffix);
    path.with_file_name(name)
}

/// Reject collections no store could have produced.
fn check_invariants(records: &[Record]) -> std::result::Result<(), String> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.id == 0 {
            return Err("record id 0 is not allowed".to_string());
        }
        if !seen.insert(record.id) {
            return Err(format!("duplicate record id {}", record.id));
        }
        if record.description.trim().is_empty() {
            return Err(format!("record {} has an empty description", record.id));
        }
    }
    Ok(())
}
