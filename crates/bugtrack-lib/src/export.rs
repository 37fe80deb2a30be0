//! Markdown table export.
//!
//! Export output is a standalone artifact and is never read back.

use chrono::NaiveDateTime;

use crate::model::{Record, timestamp_format};

/// Number of columns in an exported table.
pub const COLUMN_COUNT: usize = 6;

/// Column titles, in column order: id, description, priority, status,
/// created, updated.
pub type Headers<'a> = [&'a str; COLUMN_COUNT];

pub const DEFAULT_HEADERS: Headers<'static> =
    ["ID", "Description", "Priority", "Status", "Created", "Updated"];

/// Heading written above the table in an exported document.
pub const DOCUMENT_TITLE: &str = "# Bug List Export";

/// Make `text` safe to place in one table cell.
///
/// Backslashes are doubled and pipes escaped, so no input text can close
/// a cell early. Line breaks become `<br>`.
#[must_use]
pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("<br>");
            }
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}

fn row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(cell.as_ref());
        line.push_str(" |");
    }
    line
}

/// Render records as a pipe-delimited Markdown table sorted by id.
///
/// An empty slice yields a single `(empty)` placeholder row.
#[must_use]
pub fn render_table(records: &[Record], headers: &Headers<'_>) -> String {
    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(row(headers.iter().map(|h| escape_cell(h))));
    lines.push(row(["---"; COLUMN_COUNT]));

    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by_key(|r| r.id);

    for record in sorted {
        lines.push(row([
            record.id.to_string(),
            escape_cell(&record.description),
            record.priority.as_str().to_string(),
            record.status.as_str().to_string(),
            record.created_at.format(timestamp_format::FORMAT).to_string(),
            record.updated_at.format(timestamp_format::FORMAT).to_string(),
        ]));
    }

    if records.is_empty() {
        lines.push(row(["(empty)", "-", "-", "-", "-", "-"]));
    }

    lines.join("\n")
}

/// Render a complete Markdown document: title, blank line, table.
#[must_use]
pub fn render_document(records: &[Record], headers: &Headers<'_>) -> String {
    format!("{DOCUMENT_TITLE}\n\n{}\n", render_table(records, headers))
}

/// File name suggested for an export made at `at`.
#[must_use]
pub fn default_export_file_name(at: NaiveDateTime) -> String {
    format!("bugs_{}.md", at.format("%Y%m%d_%H%M%S"))
}
