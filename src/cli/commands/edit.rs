//! Edit command implementation.
//!
//! Only fields that differ from the stored record count as changes; a
//! blank description is ignored rather than rejected.

use crate::cli::EditArgs;
use crate::config::Config;
use crate::format::UpdateResult;
use anyhow::{Result, bail};
use bugtrack_lib::{BugtrackError, RecordUpdate};

use super::{open_store, print_json, report_notices};

/// Execute the edit command.
///
/// # Errors
///
/// Returns an error if no field was given or the record does not exist.
pub fn execute(args: &EditArgs, json: bool, config: &Config) -> Result<()> {
    let update = RecordUpdate {
        description: args.description.clone(),
        priority: args.priority,
        status: args.status,
    };
    if update.is_empty() {
        bail!("Nothing to update: pass --description, --priority or --status");
    }

    let mut store = open_store(config);
    let changed = store.update(args.id, &update)?;
    report_notices(&mut store);

    if json {
        let record = store
            .get(args.id)
            .cloned()
            .ok_or(BugtrackError::RecordNotFound { id: args.id })?;
        print_json(&UpdateResult {
            id: args.id,
            changed,
            record,
        })?;
    } else if changed {
        println!("Updated #{}", args.id);
    } else {
        println!("No changes to #{}", args.id);
    }

    Ok(())
}
