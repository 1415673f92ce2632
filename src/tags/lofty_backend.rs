//! [`TagBackend`] implementation backed by lofty.
//!
//! Uses the primary tag type of each format (ID3v2 for MP3/WAV, Vorbis
//! comments for FLAC/OGG, MP4 atoms for M4A), creating the tag when the
//! file has none yet. Association names are stored as picture
//! descriptions, so several images can live side by side in one file.
//!
//! Every mutation rewrites the tag in the file before returning, so a full
//! tagging pass writes a file once per field set and once per image.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};

use super::{Field, ImageSelector, TagAccess, TagBackend};
use crate::duplicates::file_sha256;
use crate::error::{Error, Result};
use crate::scanner::is_audio_file;

/// Opens files with lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyBackend;

impl TagBackend for LoftyBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn TagAccess>> {
        Ok(Box::new(LoftyFile::open(path)?))
    }
}

/// An audio file whose primary tag is held in memory and written back on
/// every change.
struct LoftyFile {
    path: PathBuf,
    tag: Tag,
}

impl LoftyFile {
    fn open(path: &Path) -> Result<Self> {
        if !is_audio_file(path) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        let mut tagged_file = Probe::open(path)
            .map_err(|e| Error::tag(path, format!("Failed to open file for probing: {e}")))?
            .read()
            .map_err(|e| Error::tag(path, format!("Failed to read file metadata: {e}")))?;

        let tag_type = tagged_file.primary_tag_type();
        let tag = tagged_file
            .remove(tag_type)
            .unwrap_or_else(|| Tag::new(tag_type));

        tracing::trace!(target: "tags", path = %path.display(), ?tag_type, "Opened file");

        Ok(Self {
            path: path.to_path_buf(),
            tag,
        })
    }

    fn save(&self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| Error::tag(&self.path, format!("Failed to write tags to file: {e}")))
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.tag
            .pictures()
            .iter()
            .position(|p| p.description() == Some(name))
    }
}

impl TagAccess for LoftyFile {
    fn field(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::Artist => self.tag.artist(),
            Field::Title => self.tag.title(),
            Field::Album => self.tag.album(),
        };
        value.map(|v| v.into_owned()).filter(|v| !v.is_empty())
    }

    fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        let value = value.to_string();
        match field {
            Field::Artist => self.tag.set_artist(value),
            Field::Title => self.tag.set_title(value),
            Field::Album => self.tag.set_album(value),
        }
        self.save()
    }

    fn image(&self, name: Option<&str>) -> Result<Vec<u8>> {
        let picture = match name {
            Some(name) => self.position_of(name).map(|i| &self.tag.pictures()[i]),
            None => self.tag.pictures().first(),
        };
        picture
            .map(|p| p.data().to_vec())
            .ok_or_else(|| Error::ImageNotFound {
                name: name.map(str::to_string),
            })
    }

    fn set_image(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        // Sniff the MIME type; unknown formats are still embedded
        let mime_type = Picture::from_reader(&mut Cursor::new(&data))
            .ok()
            .and_then(|p| p.mime_type().cloned());

        while let Some(index) = self.position_of(name) {
            self.tag.remove_picture(index);
        }
        self.tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            mime_type,
            Some(name.to_string()),
            data,
        ));
        self.save()
    }

    fn delete_image(&mut self, target: ImageSelector<'_>) -> Result<()> {
        match target {
            ImageSelector::Named(name) => {
                while let Some(index) = self.position_of(name) {
                    self.tag.remove_picture(index);
                }
            }
            ImageSelector::All => {
                while !self.tag.pictures().is_empty() {
                    self.tag.remove_picture(0);
                }
            }
        }
        self.save()
    }

    fn content_hash(&self) -> Result<String> {
        Ok(file_sha256(&self.path)?)
    }

    fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }
}
