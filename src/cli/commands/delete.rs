//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::config::Config;
use crate::format::DeleteResult;
use anyhow::Result;

use super::{open_store, print_json, report_notices};

/// Execute the delete command.
///
/// Unknown ids are reported but are not an error.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn execute(args: &DeleteArgs, json: bool, config: &Config) -> Result<()> {
    let mut store = open_store(config);

    let results: Vec<DeleteResult> = args
        .ids
        .iter()
        .map(|&id| DeleteResult {
            id,
            deleted: store.delete(id),
        })
        .collect();
    report_notices(&mut store);

    if json {
        return print_json(&results);
    }

    for result in &results {
        if result.deleted {
            println!("Deleted #{}", result.id);
        } else {
            println!("No record #{}", result.id);
        }
    }
    Ok(())
}
