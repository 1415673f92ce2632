//! Application-wide error types.
//!
//! Library modules return [`Result`] with the [`Error`] enum below, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - Each failure the tagging engine can report has its own variant, so
//!   callers can decide per kind whether a failure is fatal for a call or
//!   only a warning for one file.
//! - All errors implement `std::error::Error` for compatibility.

use std::path::PathBuf;

use crate::associations::AssociationKind;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the supported audio formats
    #[error("Not supported type: {0}")]
    UnsupportedFormat(PathBuf),

    /// Artist has no entries in the store used to apply associations
    #[error("No {kind} associations for artist '{artist}'")]
    NoAssociation {
        kind: AssociationKind,
        artist: String,
    },

    /// No embedded image stored under the requested association name
    #[error("No such image: {}", name.as_deref().unwrap_or("<any>"))]
    ImageNotFound { name: Option<String> },

    /// Image file referenced by an association is missing on disk
    #[error("Failed to find image: {0}")]
    MissingImageFile(PathBuf),

    /// Ban list or association resource does not exist
    #[error("Resource not found: {0}")]
    ResourceNotFound(PathBuf),

    /// Path is neither a file nor a directory
    #[error("No such file or directory: {0}")]
    PathNotFound(PathBuf),

    /// Deleting an association that does not exist
    #[error("No association '{key}' for artist '{artist}'")]
    AssociationNotFound { artist: String, key: String },

    /// Tag container reading/writing error
    #[error("Tag error for {path}: {message}")]
    Tag { path: PathBuf, message: String },

    /// Association resource could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a tag codec error.
    pub fn tag(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Tag {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a no-association error.
    pub fn no_association(kind: AssociationKind, artist: impl Into<String>) -> Self {
        Self::NoAssociation {
            kind,
            artist: artist.into(),
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}
