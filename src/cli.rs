use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "WYCO shooting league classification backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Load exported match results (a JSON file or a directory of them)
    Ingest {
        /// Export file or directory
        path: PathBuf,
    },
    /// Normalize match scores and update shooter classifications
    Process {
        /// Classify shooters without an active membership number as well
        #[arg(long)]
        include_inactive: bool,
    },
    /// Import the membership roster CSV
    ImportMembers {
        /// Roster CSV file
        csv: PathBuf,
    },
    /// Merge shooter records whose names differ only in formatting
    Dedupe {
        /// Only report what would be merged
        #[arg(long)]
        dry_run: bool,
    },
    /// Merge one shooter record into another
    Merge {
        /// Shooter id to keep
        #[arg(long)]
        into: i64,
        /// Shooter id to fold in and delete
        #[arg(long)]
        from: i64,
    },
    /// Delete matches (and their scores) dated before a day
    Prune {
        /// Cutoff date, YYYY-MM-DD
        #[arg(long)]
        before: NaiveDate,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}
