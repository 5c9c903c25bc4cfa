//! # mealdeck admin
//!
//! Command-line front end for the admin dashboard: the analytics report,
//! the review moderation listing, the user listing and a store check.

pub mod cli;
pub mod commands;
pub mod report;

pub use cli::{Args, Command, OutputFormat};
pub use commands::{execute, resolve_config, run, Probe};
