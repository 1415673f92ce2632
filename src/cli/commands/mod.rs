//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `tag`: Auto tagging of a file or directory
//! - `duplicates`: Duplicate file search
//! - `associations`: Image and album association maintenance
//! - `ban`: Ban list maintenance
//! - `images`: Embedded image export and removal
//! - `config`: Config file creation and inspection

mod associations;
mod ban;
mod config;
mod duplicates;
mod images;
mod tag;

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::associations::AssociationKind;
use crate::config::Config;
use crate::events::LockedWriter;
use crate::tagger::AutoTagger;
use crate::tags::LoftyBackend;

pub use associations::cmd_assoc;
pub use ban::cmd_ban;
pub use config::cmd_config;
pub use duplicates::cmd_duplicates;
pub use images::cmd_images;
pub use tag::cmd_tag;

/// Tag Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the one in the config directory
    #[arg(long, global = true, env = "TAG_MINDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Tag an audio file, or every audio file in a directory
    Tag {
        /// Path to the file or directory
        path: PathBuf,
        /// Only set the artist when the file has none
        #[arg(long)]
        fill_artist: bool,
        /// Only set the title when the file has none
        #[arg(long)]
        fill_title: bool,
        /// Only embed images the file does not already have
        #[arg(long)]
        fill_image: bool,
        /// Only set the album when the file has none
        #[arg(long)]
        fill_album: bool,
    },
    /// Find files with identical content in a directory
    Duplicates {
        /// Directory to search
        dir: PathBuf,
    },
    /// Maintain image or album associations
    Assoc {
        /// Which store to operate on
        #[arg(value_enum)]
        store: StoreArg,
        #[command(subcommand)]
        action: AssocAction,
    },
    /// Maintain the list of fragments stripped from file names
    Ban {
        #[command(subcommand)]
        action: BanAction,
    },
    /// Export or remove images embedded in an audio file
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
    /// Create or inspect the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Association store selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    Image,
    Album,
}

impl From<StoreArg> for AssociationKind {
    fn from(store: StoreArg) -> Self {
        match store {
            StoreArg::Image => AssociationKind::Image,
            StoreArg::Album => AssociationKind::Album,
        }
    }
}

/// Association store operations.
///
/// KEY is the association name for images and the track title for albums.
#[derive(Subcommand)]
pub enum AssocAction {
    /// Add or replace one association
    Add {
        artist: String,
        key: String,
        /// Image file path, or album name
        value: String,
    },
    /// Delete one association
    Delete { artist: String, key: String },
    /// List every association
    List,
    /// Associate every suitable file in a directory
    Associate {
        dir: PathBuf,
        /// Image association name, or album name
        key: String,
    },
    /// Merge associations from a JSON file
    Import { file: PathBuf },
    /// Remove every association
    Clear,
}

#[derive(Subcommand)]
pub enum BanAction {
    /// Show every banned fragment
    List,
    /// Ban a fragment
    Add { fragment: String },
    /// Remove a banned fragment
    Remove { fragment: String },
}

#[derive(Subcommand)]
pub enum ImagesAction {
    /// Write an embedded image to a file
    Export {
        /// Audio file to read from
        file: PathBuf,
        /// Destination image file
        output: PathBuf,
        /// Association name of the image (default: first image)
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove embedded images
    Remove {
        /// Audio file to modify
        file: PathBuf,
        /// Association name of the image to remove
        #[arg(long, required_unless_present = "all")]
        name: Option<String>,
        /// Remove every embedded image
        #[arg(long, conflicts_with = "name")]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref());

    match &cli.command {
        Commands::Tag {
            path,
            fill_artist,
            fill_title,
            fill_image,
            fill_album,
        } => cmd_tag(
            config,
            path,
            tag::FillFlags {
                artist: *fill_artist,
                title: *fill_title,
                image: *fill_image,
                album: *fill_album,
            },
        ),
        Commands::Duplicates { dir } => cmd_duplicates(dir),
        Commands::Assoc { store, action } => cmd_assoc(config, (*store).into(), action),
        Commands::Ban { action } => cmd_ban(config, action),
        Commands::Images { action } => cmd_images(action),
        Commands::Config { action } => cmd_config(&config, cli.config.as_deref(), action),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    }
}

/// Tagger for maintenance commands. Load progress goes to stderr so stdout
/// only carries command output.
pub(crate) fn open_tagger(config: Config) -> AutoTagger<LoftyBackend> {
    AutoTagger::new(
        config.resources,
        LoftyBackend,
        Arc::new(LockedWriter::new(io::stderr())),
    )
}
