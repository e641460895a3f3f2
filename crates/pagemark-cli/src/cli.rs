//! CLI argument definitions for Pagemark.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pagemark",
    version,
    about = "Pagemark - Track how far you are through the books you own",
    long_about = "Track reading progress per book as logged page ranges.\n\n\
                  Progress percentage and the share of the purchase price already\n\
                  consumed are computed from the enabled ranges."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the reading data (overrides settings).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Settings file to read instead of the platform default.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Answer "yes" to confirmation prompts.
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List books, oldest first, with their progress.
    Books {
        /// Only books whose title contains this text (case-sensitive).
        #[arg(long = "filter", value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Register a new book.
    AddBook(AddBookArgs),

    /// Change a book's title.
    Rename {
        #[arg(value_name = "BOOK")]
        id: String,
        title: String,
    },

    /// Change a book's price.
    Reprice {
        #[arg(value_name = "BOOK")]
        id: String,
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },

    /// Change a book's total page count. Deletes all of its logged progress.
    Resize {
        #[arg(value_name = "BOOK")]
        id: String,
        #[arg(allow_negative_numbers = true)]
        pages: i64,
    },

    /// Delete a book and all of its logged progress.
    RemoveBook {
        #[arg(value_name = "BOOK")]
        id: String,
    },

    /// Show a book with its logged progress.
    Show {
        #[arg(value_name = "BOOK")]
        id: String,
    },

    /// Log a page range as read.
    Log(LogArgs),

    /// Enable or disable a logged range.
    Toggle {
        #[arg(value_name = "BOOK")]
        id: String,
        #[arg(value_name = "ENTRY")]
        entry: String,
    },

    /// Delete a logged range.
    Unlog {
        #[arg(value_name = "BOOK")]
        id: String,
        #[arg(value_name = "ENTRY")]
        entry: String,
    },
}

#[derive(Args)]
pub struct AddBookArgs {
    /// Book title.
    #[arg(long = "title")]
    pub title: String,

    /// Total number of pages.
    #[arg(long = "pages", allow_negative_numbers = true)]
    pub pages: i64,

    /// Purchase price.
    #[arg(long = "price", allow_negative_numbers = true)]
    pub price: f64,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(value_name = "BOOK")]
    pub id: String,

    /// First page read (default: the page after the last logged range).
    #[arg(long = "from")]
    pub from: Option<u32>,

    /// Last page read.
    #[arg(long = "to")]
    pub to: u32,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
