//! Command-line interface for `bugtrack`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use bugtrack_lib::{BugtrackError, Priority, RecordFilter, RecordId, Status};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::{self, CliOverrides};
use crate::logging;

/// `bugtrack` (bt) - Single-user bug tracker.
#[derive(Parser, Debug)]
#[command(name = "bt")]
#[command(
    author,
    version,
    about = "Single-user bug tracker (JSON file store)",
    long_about = None,
    after_help = "Every change is written to the data file before the command returns."
)]
pub struct Cli {
    /// Data file (overrides config and BUGTRACK_DATA)
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new record
    #[command(alias = "create")]
    Add(CreateArgs),

    /// List all records
    List,

    /// Show record details
    Show(ShowArgs),

    /// Edit an existing record
    #[command(alias = "update")]
    Edit(EditArgs),

    /// Mark a record as Done
    Done(DoneArgs),

    /// Delete one or more records
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Search records by keyword, priority and status
    Search(FilterArgs),

    /// Export records as a Markdown table
    Export(ExportArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// What is wrong
    pub description: String,

    /// Priority: low, medium, high (default from config)
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Status: open, in-progress, done (default from config)
    #[arg(short, long)]
    pub status: Option<Status>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Record ID
    pub id: RecordId,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Record ID
    pub id: RecordId,

    /// New description (blank values are ignored)
    #[arg(short, long)]
    pub description: Option<String>,

    /// New priority
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New status
    #[arg(short, long)]
    pub status: Option<Status>,
}

#[derive(Args, Debug, Clone)]
pub struct DoneArgs {
    /// Record ID
    pub id: RecordId,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Record IDs
    #[arg(required = true)]
    pub ids: Vec<RecordId>,
}

/// Keyword / priority / status narrowing shared by search and export.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text to look for in descriptions
    pub keyword: Option<String>,

    /// Priority, or "all"
    #[arg(short, long, default_value = "all")]
    pub priority: Selection<Priority>,

    /// Status, or "all"
    #[arg(short, long, default_value = "all")]
    pub status: Selection<Status>,
}

impl FilterArgs {
    #[must_use]
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter {
            keyword: self.keyword.clone(),
            priority: self.priority.into_option(),
            status: self.status.into_option(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file (default: bugs_<timestamp>.md in the export directory)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the Markdown document instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// A filter value that is either "all" or one specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Copy> Selection<T> {
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr<Err = BugtrackError>> FromStr for Selection<T> {
    type Err = BugtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_file: cli.data.clone(),
    };
    let config = config::load(&overrides).context("Failed to load configuration")?;

    logging::init_logging(cli.verbose, cli.quiet, config.log_file.as_deref())
        .context("Failed to initialize logging")?;
    tracing::debug!(data_file = %config.data_file.display(), "Configuration loaded");

    let json = cli.json;
    match cli.command {
        Some(Commands::Add(args)) => commands::create::execute(&args, json, &config),
        Some(Commands::List) => commands::list::execute(json, &config),
        Some(Commands::Show(args)) => commands::show::execute(&args, json, &config),
        Some(Commands::Edit(args)) => commands::edit::execute(&args, json, &config),
        Some(Commands::Done(args)) => commands::done::execute(&args, json, &config),
        Some(Commands::Delete(args)) => commands::delete::execute(&args, json, &config),
        Some(Commands::Search(args)) => commands::search::execute(&args, json, &config),
        Some(Commands::Export(args)) => commands::export::execute(&args, json, &config),
        Some(Commands::Completions(args)) => {
            commands::completions::execute(args.shell);
            Ok(())
        }
        None => {
            println!("bt - Single-user bug tracker. Use --help for usage.");
            Ok(())
        }
    }
}
