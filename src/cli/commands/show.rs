//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::format::format_record_details;
use anyhow::Result;
use bugtrack_lib::BugtrackError;
use bugtrack_lib::model::now;

use super::{open_store, print_json};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the record does not exist.
pub fn execute(args: &ShowArgs, json: bool, config: &Config) -> Result<()> {
    let store = open_store(config);
    let record = store
        .get(args.id)
        .ok_or(BugtrackError::RecordNotFound { id: args.id })?;

    if json {
        print_json(record)?;
    } else {
        println!("{}", format_record_details(record, now()));
    }

    Ok(())
}
