//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::draft::SubmissionDraft;

/// Join command arguments.
#[derive(Debug, Args)]
pub struct JoinCommand {
    /// Your name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Your work email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Your biggest admin headache
    #[arg(long, default_value = "")]
    pub pain: String,

    /// Post to this collector endpoint instead of the configured one
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Keep fallback records in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

impl JoinCommand {
    /// The draft described by the arguments.
    #[must_use]
    pub fn draft(&self) -> SubmissionDraft {
        SubmissionDraft::new(self.name.clone(), self.email.clone(), self.pain.clone())
    }
}

/// Fallback log commands.
///
/// The log is append-only; there is no command that removes records.
#[derive(Debug, Subcommand)]
pub enum FallbackCommand {
    /// List submissions captured locally after the collector rejected them
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show how many submissions are in the fallback log
    Count,

    /// Show the fallback database path
    Path,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per record
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON array
    Json,
}
