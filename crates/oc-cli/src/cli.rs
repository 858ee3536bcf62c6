//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oc_core::Timestamp;

/// Clock time against headings in an org file.
///
/// Clock entries live in each heading's `:LOGBOOK:` drawer, exactly as
/// Emacs org-mode writes them.
#[derive(Debug, Parser)]
#[command(name = "oc", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Org file to operate on (defaults to `default_file` from config).
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a clock on the heading that owns a line.
    In {
        /// Any line inside the heading's section (1-based).
        #[arg(short, long)]
        line: usize,
    },

    /// Stop the running clock.
    Out,

    /// Discard the running clock without recording it.
    Cancel,

    /// Refresh the `=> H:MM` estimate of a clock line from its timestamps.
    Recalc {
        /// The clock line (1-based).
        #[arg(short, long)]
        line: usize,
    },

    /// Show the running clock.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show clocked time per heading.
    Report {
        /// Only count entries starting or ending at or after this time.
        #[arg(long)]
        from: Option<Timestamp>,

        /// Only count entries starting or ending at or before this time.
        #[arg(long)]
        to: Option<Timestamp>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
