//! Command-line interface for tag-minder.
//!
//! This module provides CLI commands for auto tagging files, finding
//! duplicates, and maintaining the ban list and association stores.

mod commands;

pub use commands::{Cli, Commands, run_command};
