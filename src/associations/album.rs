//! Artist → (title, album) associations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Association, AssociationKind, AssociationStore};
use crate::error::Result;
use crate::events::EventSink;
use crate::scanner::{display_name, list_audio_files};
use crate::tags::{Field, TagBackend};

/// Album recorded for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumEntry {
    pub title: String,
    pub album: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArtistAlbums {
    artist: String,
    entries: Vec<AlbumEntry>,
}

/// Albums recorded per artist, keyed by exact title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumAssociations {
    artists: Vec<ArtistAlbums>,
}

impl AlbumAssociations {
    /// Pairs recorded for `artist`, in insertion order.
    pub fn entries_for(&self, artist: &str) -> Option<&[AlbumEntry]> {
        self.find(artist).map(|a| a.entries.as_slice())
    }

    /// Album recorded for the exact (`artist`, `title`) pair.
    pub fn album_for(&self, artist: &str, title: &str) -> Option<&str> {
        self.entries_for(artist)?
            .iter()
            .find(|e| e.title == title)
            .map(|e| e.album.as_str())
    }

    /// Associate every audio file directly inside `dir` with `album`, using
    /// the artist and title already tagged in each file.
    ///
    /// Files that cannot be opened or lack an artist or title are skipped
    /// with a Warning event. Returns how many associations were added.
    pub fn associate_directory(
        &mut self,
        dir: &Path,
        album: &str,
        backend: &dyn TagBackend,
        sink: &dyn EventSink,
    ) -> Result<usize> {
        let mut added = 0;
        for path in list_audio_files(dir)? {
            let file = match backend.open(&path) {
                Ok(file) => file,
                Err(e) => {
                    sink.warning(format!("Skipping {}: {}", display_name(&path), e));
                    continue;
                }
            };
            let (Some(artist), Some(title)) = (file.field(Field::Artist), file.field(Field::Title))
            else {
                sink.warning(format!(
                    "Skipping {}: artist and title tags are required",
                    display_name(&path)
                ));
                continue;
            };

            sink.info(format!("association added - {artist} - {title} - {album}"));
            self.add(&artist, &title, album.to_string());
            added += 1;
        }
        Ok(added)
    }

    fn find(&self, artist: &str) -> Option<&ArtistAlbums> {
        self.artists.iter().find(|a| a.artist == artist)
    }

    fn find_mut(&mut self, artist: &str) -> Option<&mut ArtistAlbums> {
        self.artists.iter_mut().find(|a| a.artist == artist)
    }
}

impl AssociationStore for AlbumAssociations {
    type Value = String;

    const KIND: AssociationKind = AssociationKind::Album;

    /// A matching title keeps its position and gets the new album; a new
    /// title is appended.
    fn add(&mut self, artist: &str, key: &str, value: String) {
        match self.find_mut(artist) {
            Some(entry) => match entry.entries.iter_mut().find(|e| e.title == key) {
                Some(existing) => existing.album = value,
                None => entry.entries.push(AlbumEntry {
                    title: key.to_string(),
                    album: value,
                }),
            },
            None => self.artists.push(ArtistAlbums {
                artist: artist.to_string(),
                entries: vec![AlbumEntry {
                    title: key.to_string(),
                    album: value,
                }],
            }),
        }
    }

    /// Missing entries are ignored: returns `Ok(false)` instead of failing.
    fn delete(&mut self, artist: &str, key: &str) -> Result<bool> {
        let Some(entry) = self.find_mut(artist) else {
            return Ok(false);
        };
        match entry.entries.iter().position(|e| e.title == key) {
            Some(index) => {
                entry.entries.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self) -> Box<dyn Iterator<Item = Association> + '_> {
        Box::new(self.artists.iter().flat_map(|a| {
            a.entries.iter().map(move |e| Association {
                artist: a.artist.clone(),
                key: e.title.clone(),
                value: e.album.clone(),
            })
        }))
    }

    fn contains_artist(&self, artist: &str) -> bool {
        self.find(artist).is_some_and(|a| !a.entries.is_empty())
    }

    fn merge(&mut self, other: Self) {
        for artist in other.artists {
            for entry in artist.entries {
                self.add(&artist.artist, &entry.title, entry.album);
            }
        }
    }

    fn artist_count(&self) -> usize {
        self.artists.iter().filter(|a| !a.entries.is_empty()).count()
    }
}
