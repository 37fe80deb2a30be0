//! Error types for `bugtrack-lib`.
//!
//! Hard failures are [`BugtrackError`] values. Conditions the operator
//! should hear about but that never stop the program are [`Notice`]s.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::RecordId;

/// Primary error type for bugtrack-lib operations.
#[derive(Error, Debug)]
pub enum BugtrackError {
    // === Record Errors ===
    /// Record with the specified ID was not found.
    #[error("Record not found: #{id}")]
    RecordNotFound { id: RecordId },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Unknown priority text.
    #[error("Invalid priority: {value} (expected Low, Medium or High)")]
    InvalidPriority { value: String },

    /// Unknown status text.
    #[error("Invalid status: {value} (expected Open, In Progress or Done)")]
    InvalidStatus { value: String },

    // === Data Errors ===
    /// A key-value map could not be turned into a record.
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// The data file exists but does not hold a valid record collection.
    #[error("Corrupt data file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BugtrackError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `BugtrackError`.
pub type Result<T> = std::result::Result<T, BugtrackError>;

/// A non-fatal condition queued by the store for the operator.
///
/// The in-memory collection stays usable after any notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The data file could not be read or parsed; the store started empty.
    /// `backup` holds a copy of the rejected file when one could be made.
    Corrupt {
        path: PathBuf,
        reason: String,
        backup: Option<PathBuf>,
    },
    /// A persist failed; the latest mutation may not be on disk.
    SaveFailed { path: PathBuf, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupt {
                path,
                reason,
                backup,
            } => {
                write!(
                    f,
                    "data file {} is corrupt or unreadable ({reason}); starting with no records",
                    path.display()
                )?;
                match backup {
                    Some(backup) => write!(f, "; original kept at {}", backup.display()),
                    None => Ok(()),
                }
            }
            Self::SaveFailed { path, reason } => write!(
                f,
                "could not save {} ({reason}); recent changes may not be on disk",
                path.display()
            ),
        }
    }
}
