//! CLI definition for the checkboard command-line driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Three-column checklist board backed by a local SQLite snapshot.
#[derive(Parser, Debug)]
#[command(name = "checkboard")]
#[command(version)]
#[command(about = "Three-column checklist board")]
pub struct Cli {
    /// SQLite file holding the board snapshot
    #[arg(
        long,
        env = "CHECKBOARD_DB",
        default_value = "checkboard.sqlite3",
        global = true
    )]
    pub db: PathBuf,

    /// Absolute directory for rolling log files; logging stays off when unset
    #[arg(long, env = "CHECKBOARD_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "CHECKBOARD_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every column and card
    Show {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a card with 3 to 5 checklist items
    Add {
        /// Target column index (0 = entry, 1 = mid)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
        column: u8,
        /// Card title
        #[arg(long)]
        title: String,
        /// Checklist item text, repeat 3 to 5 times
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Toggle one checklist item
    Toggle {
        /// Column index of the card
        column: usize,
        /// Card index within the column
        card: usize,
        /// Item index within the card
        item: usize,
        /// Reason recorded when the card falls back to the entry column
        #[arg(long)]
        reason: Option<String>,
    },
    /// Discard every card
    Reset,
}
