//! Text formatting functions for `bugtrack`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ✓)
//! - Record line formatting, width-aware
//! - Multi-line record details for `bt show`

use bugtrack_lib::model::timestamp_format;
use bugtrack_lib::{Record, Status, Timestamp};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width reserved for descriptions in list output.
pub const DESCRIPTION_WIDTH: usize = 60;

/// Status icon characters.
pub mod icons {
    /// Open - waiting for work (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Done - completed (checkmark).
    pub const DONE: &str = "✓";
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: &Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Done => icons::DONE,
    }
}

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when cut.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Format a single-line record summary.
///
/// Format: `{icon} #{id} [{priority}] {status} {description}`
#[must_use]
pub fn format_record_line(record: &Record) -> String {
    format!(
        "{} #{} [{}] {} {}",
        format_status_icon(&record.status),
        record.id,
        record.priority,
        record.status,
        truncate_to_width(&record.description, DESCRIPTION_WIDTH),
    )
}

/// Coarse "how long ago" label, e.g. `5m`, `3h`, `2d`.
#[must_use]
pub fn format_age(then: Timestamp, now: Timestamp) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => format!("{}h", secs / 3_600),
        _ => format!("{}d", secs / 86_400),
    }
}

/// Multi-line details for one record.
#[must_use]
pub fn format_record_details(record: &Record, now: Timestamp) -> String {
    format!(
        "#{id} {description}\n\
         Priority: {priority}\n\
         Status:   {icon} {status}\n\
         Created:  {created}\n\
         Updated:  {updated} ({age} ago)",
        id = record.id,
        description = record.description,
        priority = record.priority,
        icon = format_status_icon(&record.status),
        status = record.status,
        created = record.created_at.format(timestamp_format::FORMAT),
        updated = record.updated_at.format(timestamp_format::FORMAT),
        age = format_age(record.updated_at, now),
    )
}
