//! List command implementation.
//!
//! Shows every record in insertion order.

use crate::config::Config;
use anyhow::Result;

use super::{open_store, print_records};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn execute(json: bool, config: &Config) -> Result<()> {
    let store = open_store(config);
    print_records(&store.list(), json)
}
