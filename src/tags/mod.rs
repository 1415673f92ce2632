//! Narrow interface to the tag container of an audio file.
//!
//! The tagging engine only ever talks to files through [`TagAccess`]; it
//! never touches the binary layout of a tag. [`TagBackend`] opens files and
//! is the seam where tests substitute an in-memory implementation.
//!
//! The production backend is [`LoftyBackend`], built on the lofty crate.

mod lofty_backend;

pub use lofty_backend::LoftyBackend;

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Textual tag fields the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Artist,
    Title,
    Album,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Artist => "artist",
            Field::Title => "title",
            Field::Album => "album",
        };
        f.write_str(name)
    }
}

/// Which embedded images a delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSelector<'a> {
    /// The image stored under one association name
    Named(&'a str),
    /// Every embedded image
    All,
}

/// One opened audio file.
///
/// Mutations are persisted to the file before the call returns.
pub trait TagAccess {
    /// Current value of a field. Empty values are reported as `None`.
    fn field(&self, field: Field) -> Option<String>;

    fn set_field(&mut self, field: Field, value: &str) -> Result<()>;

    /// Raw bytes of the image stored under `name`, or of the first image
    /// when `name` is `None`.
    ///
    /// Fails with [`Error::ImageNotFound`](crate::error::Error::ImageNotFound)
    /// when there is no such image.
    fn image(&self, name: Option<&str>) -> Result<Vec<u8>>;

    /// Store `data` under `name`, replacing any image with the same name.
    fn set_image(&mut self, name: &str, data: Vec<u8>) -> Result<()>;

    fn delete_image(&mut self, target: ImageSelector<'_>) -> Result<()>;

    /// Lowercase hex SHA-256 of the whole file.
    fn content_hash(&self) -> Result<String>;

    /// File size in bytes.
    fn size(&self) -> Result<u64>;
}

/// Opens audio files for tag access.
pub trait TagBackend: Send + Sync {
    /// Open `path`. Fails with
    /// [`Error::UnsupportedFormat`](crate::error::Error::UnsupportedFormat)
    /// when the extension is not a supported audio format.
    fn open(&self, path: &Path) -> Result<Box<dyn TagAccess>>;
}

impl<B: TagBackend + ?Sized> TagBackend for std::sync::Arc<B> {
    fn open(&self, path: &Path) -> Result<Box<dyn TagAccess>> {
        (**self).open(path)
    }
}
