use crate::cli::CreateArgs;
use crate::config::Config;
use anyhow::Result;

use super::{open_store, print_json, report_notices};

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the description is blank.
pub fn execute(args: &CreateArgs, json: bool, config: &Config) -> Result<()> {
    let mut store = open_store(config);

    let priority = args.priority.unwrap_or(config.default_priority);
    let status = args.status.unwrap_or(config.default_status);
    let record = store.create(&args.description, priority, status)?;
    report_notices(&mut store);

    if json {
        print_json(&record)?;
    } else {
        println!("Created #{}: {}", record.id, record.description);
    }

    Ok(())
}
