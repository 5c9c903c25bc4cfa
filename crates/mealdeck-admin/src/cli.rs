//! Command line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Admin dashboard and moderation listings for the recipe app
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, global = true, env = "MEALDECK_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load every collection and print the analytics dashboard
    Dashboard {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List reviews, newest first
    Reviews {
        /// Match reviewer name or comment, ignoring case
        #[arg(short, long)]
        search: Option<String>,

        /// Only reviews with this many stars
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// List user accounts
    Users {
        /// Match name or email, ignoring case
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Check that the data store answers
    Check,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
