//! Tag Minder - automatic tagging for audio files.
//!
//! Infers artist and title from file names, embeds images and sets albums
//! recorded per artist, and finds files with identical content. Everything
//! is driven from CLI commands.

pub mod apply;
pub mod associations;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod events;
pub mod naming;
pub mod scanner;
pub mod tagger;
pub mod tags;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging. Engine targets ("config", "tagger", ...) fall
    // under the default level, so warnings stay visible without RUST_LOG.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?
        .add_directive("tag_minder=info".parse()?);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
