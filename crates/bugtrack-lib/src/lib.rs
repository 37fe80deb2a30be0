//! `bugtrack-lib` - In-process bug record store.
//!
//! Records live in memory and are written back to a single JSON file
//! after every mutation. The store never aborts on bad data: a corrupt
//! file is reported as a [`Notice`] and the store starts empty.
//!
//! # Quick Start
//!
//! ```no_run
//! use bugtrack_lib::{Priority, RecordFilter, RecordStore, RecordUpdate, Status};
//!
//! // Load (or start) the data file
//! let mut store = RecordStore::open("bugs.json");
//! for notice in store.drain_notices() {
//!     eprintln!("warning: {notice}");
//! }
//!
//! // Create
//! let record = store.create("Crash on save", Priority::High, Status::Open).unwrap();
//!
//! // Update
//! store.update(record.id, &RecordUpdate { status: Some(Status::Done), ..Default::default() }).unwrap();
//!
//! // Query
//! let hits = store.filter(&RecordFilter::keyword("crash"));
//! assert_eq!(hits.len(), 1);
//! ```

pub mod error;
pub mod export;
pub mod json;
pub mod model;
pub mod query;
pub mod store;

pub use error::{BugtrackError, Notice, Result};
pub use export::{DEFAULT_HEADERS, Headers};
pub use model::{Priority, Record, RecordId, Status, Timestamp};
pub use query::{RecordFilter, RecordUpdate};
pub use store::{Completion, RecordStore};
