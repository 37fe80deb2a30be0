//! Search command implementation.
//!
//! Narrows records by keyword, priority and status; results are sorted
//! by id.

use crate::cli::FilterArgs;
use crate::config::Config;
use anyhow::Result;

use super::{open_store, print_records};

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn execute(args: &FilterArgs, json: bool, config: &Config) -> Result<()> {
    let store = open_store(config);
    let filter = args.to_filter();
    tracing::debug!(?filter, "Searching records");
    print_records(&store.filter(&filter), json)
}
