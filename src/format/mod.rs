//! Output formatting for `bugtrack`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! JSON goes to stdout; notices and diagnostics go to stderr.
//!
//! # JSON Output Types
//!
//! - [`UpdateResult`] - Outcome of edit/done
//! - [`DeleteResult`] - Outcome of delete, one per requested id
//! - [`ExportResult`] - Where an export was written

mod output;
mod text;

pub use output::{DeleteResult, ExportResult, UpdateResult};
pub use text::{
    DESCRIPTION_WIDTH, format_age, format_record_details, format_record_line, format_status_icon,
    truncate_to_width,
};
