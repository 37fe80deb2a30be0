//! `bugtrack` (bt) - Single-user bug tracker
//!
//! Records live in one JSON file that is rewritten after every change.
//! No daemon, no server, no background processes.

use bugtrack::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
