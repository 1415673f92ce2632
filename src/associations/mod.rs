//! Recorded artist associations used to fill tags automatically.
//!
//! Two stores share the [`AssociationStore`] interface but keep their own
//! shape, so the key rules of each are enforced by the type:
//!
//! - [`ImageAssociations`]: artist → association name → image path.
//!   Names are unique per artist. Deleting a missing entry is an error.
//! - [`AlbumAssociations`]: artist → ordered (title, album) pairs. Titles
//!   are unique per artist. Deleting a missing entry is a no-op.
//!
//! Stores are persisted as JSON with whole-file rewrites. Loading a missing
//! resource yields [`Error::ResourceNotFound`] so callers can substitute an
//! empty store.

mod album;
mod image;

pub use album::{AlbumAssociations, AlbumEntry};
pub use image::{ImageAssociations, ImageEntry};

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result, ResultExt};

/// Which store an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    Image,
    Album,
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssociationKind::Image => "image",
            AssociationKind::Album => "album",
        })
    }
}

/// One flattened store entry.
///
/// `key` is the association name (image store) or the title (album store);
/// `value` is the image path or the album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub artist: String,
    pub key: String,
    pub value: String,
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.artist, self.key, self.value)
    }
}

/// Operations shared by both association stores.
pub trait AssociationStore: Default + Serialize + DeserializeOwned {
    /// What an association resolves to.
    type Value;

    const KIND: AssociationKind;

    /// Insert or overwrite the entry for (`artist`, `key`).
    fn add(&mut self, artist: &str, key: &str, value: Self::Value);

    /// Remove the entry for (`artist`, `key`). Returns whether an entry was
    /// removed; each store documents how a missing entry is treated.
    fn delete(&mut self, artist: &str, key: &str) -> Result<bool>;

    /// Flattened entries: artists in insertion order, then keys in
    /// insertion order within each artist.
    fn list(&self) -> Box<dyn Iterator<Item = Association> + '_>;

    fn contains_artist(&self, artist: &str) -> bool;

    /// Merge `other` into this store entry by entry; entries of `other`
    /// win on key collision.
    fn merge(&mut self, other: Self);

    /// Number of artists with at least one entry.
    fn artist_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.artist_count() == 0
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Restore a store from `path`.
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ResourceNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let store = serde_json::from_str(&contents)
            .map_err(Error::from)
            .with_context(format!("parsing {} associations {}", Self::KIND, path.display()))?;
        tracing::debug!(target: "associations", kind = %Self::KIND, path = %path.display(), "Loaded associations");
        Ok(store)
    }

    /// Persist the whole store to `path`, replacing any previous content.
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;

        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;

        tracing::info!(target: "associations", kind = %Self::KIND, path = %path.display(), "Saved associations");
        Ok(())
    }

    /// Load a store from `path` and merge it into this one.
    fn merge_from(&mut self, path: &Path) -> Result<()> {
        let other = Self::load(path)?;
        self.merge(other);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_resource() {
        let dir = tempdir().unwrap();
        let result = ImageAssociations::load(&dir.path().join("images.json"));
        assert!(matches!(result, Err(Error::ResourceNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("albums.json");
        fs::write(&path, "not json").unwrap();

        let err = AlbumAssociations::load(&path).unwrap_err();
        assert!(matches!(err.root(), Error::Serialization(_)));
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store").join("images.json");

        let mut store = ImageAssociations::default();
        store.add("Queen", "Front Cover", PathBuf::from("/q.jpg"));
        store.add("ABBA", "Front Cover", PathBuf::from("/a.jpg"));
        store.add("Queen", "Back Cover", PathBuf::from("/qb.jpg"));
        store.save(&path).unwrap();

        let loaded = ImageAssociations::load(&path).unwrap();
        assert_eq!(loaded, store);
        let artists: Vec<String> = loaded.list().map(|a| a.artist).collect();
        assert_eq!(artists, vec!["Queen", "Queen", "ABBA"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_merge_from_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("albums.json");

        let mut incoming = AlbumAssociations::default();
        incoming.add("Queen", "Bohemian Rhapsody", "A Night at the Opera".to_string());
        incoming.save(&path).unwrap();

        let mut store = AlbumAssociations::default();
        store.add("Queen", "Bohemian Rhapsody", "Greatest Hits".to_string());
        store.add("ABBA", "Waterloo", "Waterloo".to_string());
        store.merge_from(&path).unwrap();

        assert_eq!(
            store.album_for("Queen", "Bohemian Rhapsody"),
            Some("A Night at the Opera")
        );
        assert_eq!(store.album_for("ABBA", "Waterloo"), Some("Waterloo"));
    }

    #[test]
    fn test_clear() {
        let mut store = AlbumAssociations::default();
        store.add("Queen", "Innuendo", "Innuendo".to_string());
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_association_display() {
        let assoc = Association {
            artist: "Queen".into(),
            key: "Front Cover".into(),
            value: "/q.jpg".into(),
        };
        assert_eq!(assoc.to_string(), "Queen - Front Cover - /q.jpg");
    }
}
