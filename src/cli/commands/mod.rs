//! Command implementations.
//!
//! Each command opens the store, performs one operation and renders the
//! result. Notices queued by the store are printed to stderr as warnings.

pub mod completions;
pub mod create;
pub mod delete;
pub mod done;
pub mod edit;
pub mod export;
pub mod list;
pub mod search;
pub mod show;

use anyhow::Result;
use bugtrack_lib::{Record, RecordStore};
use serde::Serialize;

use crate::config::Config;
use crate::format::format_record_line;

/// Open the configured store and surface any load-time notices.
pub(crate) fn open_store(config: &Config) -> RecordStore {
    let mut store = RecordStore::open(&config.data_file);
    report_notices(&mut store);
    store
}

/// Print queued notices as warnings. They never change the exit code.
pub(crate) fn report_notices(store: &mut RecordStore) {
    for notice in store.drain_notices() {
        eprintln!("warning: {notice}");
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a record collection as text lines or a JSON array.
pub(crate) fn print_records(records: &[Record], json: bool) -> Result<()> {
    if json {
        return print_json(records);
    }

    if records.is_empty() {
        println!("No records found.");
    } else {
        for record in records {
            println!("{}", format_record_line(record));
        }
        println!("\n{} record(s)", records.len());
    }
    Ok(())
}
