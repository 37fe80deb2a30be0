//! Core data types for bugtrack-lib.
//!
//! The serde format is the on-disk format: a record serializes to an
//! object with `id`, `description`, `priority`, `status`, `created_at`
//! and `updated_at`, timestamps as `YYYY-MM-DDTHH:MM:SS`.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::BugtrackError;

/// Record identifier. Assigned by the store, starting at 1.
pub type RecordId = u64;

/// Local wall-clock time with whole-second precision.
pub type Timestamp = NaiveDateTime;

/// Current local time truncated to the second.
#[must_use]
pub fn now() -> Timestamp {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Parse a persisted timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` and tolerates a fractional part, which
/// is dropped.
///
/// # Errors
///
/// Returns the chrono parse error if the text is not a timestamp.
pub fn parse_timestamp(raw: &str) -> std::result::Result<Timestamp, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, timestamp_format::FORMAT).or_else(|_| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ts| ts.trunc_subsecs(0))
    })
}

/// Serde adapter for [`Timestamp`] fields.
pub mod timestamp_format {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Timestamp;

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// # Errors
    ///
    /// Fails if the value is not a string in timestamp format.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// How urgent a record is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BugtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(BugtrackError::InvalidPriority {
                value: s.to_string(),
            }),
        }
    }
}

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Done];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = BugtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(BugtrackError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// One tracked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier, unique and never reused.
    pub id: RecordId,

    /// Trimmed, non-empty description.
    pub description: String,

    pub priority: Priority,

    pub status: Status,

    /// Creation time; never changes.
    #[serde(with = "timestamp_format")]
    pub created_at: Timestamp,

    /// Last time a field actually changed value.
    #[serde(with = "timestamp_format")]
    pub updated_at: Timestamp,
}

impl Record {
    /// Build a record stamped with `created_at == updated_at == at`.
    #[must_use]
    pub fn new(
        id: RecordId,
        description: impl Into<String>,
        priority: Priority,
        status: Status,
        at: Timestamp,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            priority,
            status,
            created_at: at,
            updated_at: at,
        }
    }

    /// Serialize into a generic key-value map.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        map.insert(
            "description".to_string(),
            Value::from(self.description.clone()),
        );
        map.insert("priority".to_string(), Value::from(self.priority.as_str()));
        map.insert("status".to_string(), Value::from(self.status.as_str()));
        map.insert(
            "created_at".to_string(),
            Value::from(self.created_at.format(timestamp_format::FORMAT).to_string()),
        );
        map.insert(
            "updated_at".to_string(),
            Value::from(self.updated_at.format(timestamp_format::FORMAT).to_string()),
        );
        map
    }

    /// Deserialize from a generic key-value map.
    ///
    /// # Errors
    ///
    /// Returns `Deserialize` if a required key is missing or has the wrong type.
    pub fn from_map(map: Map<String, Value>) -> crate::Result<Self> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| BugtrackError::Deserialize(e.to_string()))
    }
}
