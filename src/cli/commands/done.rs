use crate::cli::DoneArgs;
use crate::config::Config;
use crate::format::UpdateResult;
use anyhow::Result;
use bugtrack_lib::{BugtrackError, Completion};

use super::{open_store, print_json, report_notices};

/// Execute the done command.
///
/// # Errors
///
/// Returns an error if the record does not exist.
pub fn execute(args: &DoneArgs, json: bool, config: &Config) -> Result<()> {
    let mut store = open_store(config);
    let completion = store.mark_done(args.id)?;
    report_notices(&mut store);

    if json {
        let record = store
            .get(args.id)
            .cloned()
            .ok_or(BugtrackError::RecordNotFound { id: args.id })?;
        print_json(&UpdateResult {
            id: args.id,
            changed: completion == Completion::Completed,
            record,
        })?;
        return Ok(());
    }

    match completion {
        Completion::Completed => println!("#{} marked Done", args.id),
        Completion::AlreadyDone => println!("#{} is already Done", args.id),
    }
    Ok(())
}
