//! Query and update types for record operations.

use crate::model::{Priority, Record, Status};

/// Fields to update on a record. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New description. Trimmed first; blank text is ignored.
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl RecordUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none() && self.priority.is_none() && self.status.is_none()
    }

    #[must_use]
    pub const fn status(status: Status) -> Self {
        Self {
            description: None,
            priority: None,
            status: Some(status),
        }
    }
}

/// Filter options for listing records.
///
/// `None` on `priority` or `status` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Case-insensitive substring of the description. Blank matches all.
    pub keyword: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl RecordFilter {
    #[must_use]
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        let keyword_ok = match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => record
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        };
        keyword_ok
            && self.priority.is_none_or(|p| p == record.priority)
            && self.status.is_none_or(|s| s == record.status)
    }
}
