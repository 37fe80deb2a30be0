use bugtrack_lib::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of an edit or done command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub id: RecordId,
    pub changed: bool,
    pub record: Record,
}

/// Result of deleting one id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub id: RecordId,
    pub deleted: bool,
}

/// Result of an export to a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub count: usize,
}
