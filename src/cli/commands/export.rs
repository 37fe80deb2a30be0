//! Export command implementation.
//!
//! Writes the (optionally filtered) record set as a Markdown document.
//! The export is a standalone artifact; it is never imported back.

use std::fs;
use std::path::Path;

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::format::ExportResult;
use anyhow::{Context, Result};
use bugtrack_lib::export::{DEFAULT_HEADERS, default_export_file_name, render_document};
use bugtrack_lib::model::now;

use super::{open_store, print_json};

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the export file cannot be written.
pub fn execute(args: &ExportArgs, json: bool, config: &Config) -> Result<()> {
    let store = open_store(config);
    let records = store.filter(&args.filter.to_filter());
    let document = render_document(&records, &DEFAULT_HEADERS);

    if args.stdout {
        print!("{document}");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.export_dir.join(default_export_file_name(now())));
    write_export(&path, &document)?;

    let shown = dunce::canonicalize(&path).unwrap_or_else(|_| path.clone());
    tracing::info!(path = %shown.display(), count = records.len(), "Exported records");

    if json {
        print_json(&ExportResult {
            path: shown,
            count: records.len(),
        })?;
    } else {
        if records.is_empty() {
            println!("No records matched; exported an empty table.");
        }
        println!("Exported {} record(s) to {}", records.len(), shown.display());
    }

    Ok(())
}

fn write_export(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, document).with_context(|| format!("Failed to write {}", path.display()))
}
