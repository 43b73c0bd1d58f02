//! Command-line interface for waitlist.
//!
//! This module provides the CLI structure for the `waitlist` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, FallbackCommand, JoinCommand, OutputFormat};

use crate::logging::Verbosity;

/// waitlist - Join the early-access waitlist
///
/// Validates your details, posts them to the collector endpoint and keeps a
/// local copy if the collector turns them away.
#[derive(Debug, Parser)]
#[command(name = "waitlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit your details to the waitlist
    Join(JoinCommand),

    /// Inspect the local fallback log
    #[command(subcommand)]
    Fallback(FallbackCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "waitlist");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_join() {
        let cli = Cli::try_parse_from([
            "waitlist",
            "join",
            "--name",
            "Alex Rivera",
            "--email",
            "alex@agency.co",
            "--pain",
            "too many emails",
        ])
        .unwrap();

        let Command::Join(join) = cli.command else {
            panic!("expected join");
        };
        assert_eq!(join.name, "Alex Rivera");
        assert_eq!(join.email, "alex@agency.co");
        assert!(!join.ephemeral);
        assert!(join.endpoint.is_none());
    }

    #[test]
    fn test_parse_join_missing_fields_default_to_empty() {
        let cli = Cli::try_parse_from(["waitlist", "join", "--ephemeral"]).unwrap();
        let Command::Join(join) = cli.command else {
            panic!("expected join");
        };
        assert!(join.draft().is_empty());
        assert!(join.ephemeral);
    }

    #[test]
    fn test_parse_fallback_list_json() {
        let cli = Cli::try_parse_from(["waitlist", "fallback", "list", "-f", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Fallback(FallbackCommand::List {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_fallback_has_no_delete() {
        assert!(Cli::try_parse_from(["waitlist", "fallback", "clear"]).is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["waitlist", "-c", "/custom/config.toml", "config", "path"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["waitlist", "-vv", "fallback", "count"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["waitlist", "-q", "fallback", "count"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["waitlist", "fallback", "count"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }
}
