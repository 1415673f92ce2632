//! Applying recorded associations to one opened file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::associations::{AlbumAssociations, AssociationKind, ImageAssociations};
use crate::error::{Error, Result};
use crate::tags::{Field, TagAccess};

/// Whether a value overwrites what the file already has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Always write, overwriting existing values
    #[default]
    Always,
    /// Write only when the file has no value yet
    IfAbsent,
}

/// Embed every image recorded for `artist` into `file`.
///
/// In [`ReplaceMode::IfAbsent`] an image is only written when the file has
/// no image under the same association name.
///
/// Returns the number of images written.
///
/// # Errors
///
/// - [`Error::NoAssociation`] if `artist` has no images recorded
/// - [`Error::MissingImageFile`] if a recorded image file no longer exists
pub fn apply_images(
    file: &mut dyn TagAccess,
    artist: &str,
    store: &ImageAssociations,
    mode: ReplaceMode,
) -> Result<usize> {
    let images = store
        .images_for(artist)
        .filter(|images| !images.is_empty())
        .ok_or_else(|| Error::no_association(AssociationKind::Image, artist))?;

    let mut written = 0;
    for entry in images {
        if mode == ReplaceMode::IfAbsent {
            match file.image(Some(&entry.name)) {
                Ok(_) => continue,
                Err(Error::ImageNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        let data = read_image(&entry.path)?;
        file.set_image(&entry.name, data)?;
        written += 1;
    }
    Ok(written)
}

/// Set the album recorded for (`artist`, `title`).
///
/// A title with no recorded album leaves the file untouched. In
/// [`ReplaceMode::IfAbsent`] nothing happens when the file already has an
/// album.
///
/// Returns the album written, if any.
///
/// # Errors
///
/// [`Error::NoAssociation`] if `artist` has no albums recorded.
pub fn apply_album(
    file: &mut dyn TagAccess,
    artist: &str,
    title: &str,
    store: &AlbumAssociations,
    mode: ReplaceMode,
) -> Result<Option<String>> {
    let entries = store
        .entries_for(artist)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| Error::no_association(AssociationKind::Album, artist))?;

    if mode == ReplaceMode::IfAbsent && file.field(Field::Album).is_some() {
        return Ok(None);
    }

    match entries.iter().find(|e| e.title == title) {
        Some(entry) => {
            file.set_field(Field::Album, &entry.album)?;
            Ok(Some(entry.album.clone()))
        }
        None => Ok(None),
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingImageFile(path.to_path_buf()),
        _ => Error::Io(e),
    })
}
