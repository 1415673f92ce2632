//! Artist → named image associations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Association, AssociationKind, AssociationStore};
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::scanner::{is_audio_file, list_files};

/// One image to embed, stored under an association name such as
/// `"Front Cover"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArtistImages {
    artist: String,
    images: Vec<ImageEntry>,
}

/// Images recorded per artist. Artist names are matched exactly
/// (case-sensitive, untrimmed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageAssociations {
    artists: Vec<ArtistImages>,
}

impl ImageAssociations {
    /// Images recorded for `artist`, in insertion order.
    pub fn images_for(&self, artist: &str) -> Option<&[ImageEntry]> {
        self.find(artist).map(|a| a.images.as_slice())
    }

    /// Associate every non-audio file directly inside `dir` with the artist
    /// named by its file stem, under the association name `name`.
    ///
    /// Emits one Info event per association added. Returns how many were
    /// added.
    pub fn associate_directory(
        &mut self,
        dir: &Path,
        name: &str,
        sink: &dyn EventSink,
    ) -> Result<usize> {
        let mut added = 0;
        for path in list_files(dir)? {
            if is_audio_file(&path) {
                continue;
            }
            let Some(artist) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            sink.info(format!(
                "association added - {} - {} - {}",
                artist,
                path.display(),
                name
            ));
            self.add(&artist, name, path);
            added += 1;
        }
        Ok(added)
    }

    fn find(&self, artist: &str) -> Option<&ArtistImages> {
        self.artists.iter().find(|a| a.artist == artist)
    }

    fn find_mut(&mut self, artist: &str) -> Option<&mut ArtistImages> {
        self.artists.iter_mut().find(|a| a.artist == artist)
    }
}

impl AssociationStore for ImageAssociations {
    type Value = PathBuf;

    const KIND: AssociationKind = AssociationKind::Image;

    fn add(&mut self, artist: &str, key: &str, value: PathBuf) {
        match self.find_mut(artist) {
            Some(entry) => match entry.images.iter_mut().find(|i| i.name == key) {
                Some(image) => image.path = value,
                None => entry.images.push(ImageEntry {
                    name: key.to_string(),
                    path: value,
                }),
            },
            None => self.artists.push(ArtistImages {
                artist: artist.to_string(),
                images: vec![ImageEntry {
                    name: key.to_string(),
                    path: value,
                }],
            }),
        }
    }

    /// Fails with [`Error::AssociationNotFound`] when the artist or the
    /// association name does not exist.
    fn delete(&mut self, artist: &str, key: &str) -> Result<bool> {
        let not_found = || Error::AssociationNotFound {
            artist: artist.to_string(),
            key: key.to_string(),
        };
        let entry = self.find_mut(artist).ok_or_else(not_found)?;
        let index = entry
            .images
            .iter()
            .position(|i| i.name == key)
            .ok_or_else(not_found)?;
        entry.images.remove(index);
        Ok(true)
    }

    fn list(&self) -> Box<dyn Iterator<Item = Association> + '_> {
        Box::new(self.artists.iter().flat_map(|a| {
            a.images.iter().map(move |i| Association {
                artist: a.artist.clone(),
                key: i.name.clone(),
                value: i.path.display().to_string(),
            })
        }))
    }

    fn contains_artist(&self, artist: &str) -> bool {
        self.find(artist).is_some_and(|a| !a.images.is_empty())
    }

    fn merge(&mut self, other: Self) {
        for artist in other.artists {
            for image in artist.images {
                self.add(&artist.artist, &image.name, image.path);
            }
        }
    }

    fn artist_count(&self) -> usize {
        self.artists.iter().filter(|a| !a.images.is_empty()).count()
    }
}
