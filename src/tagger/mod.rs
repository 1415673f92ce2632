//! Auto tagging of single files and whole directories.
//!
//! [`AutoTagger`] owns the ban list and both association stores for a
//! session and applies three sources of tags to each file, in order:
//!
//! 1. artist and title inferred from the file name,
//! 2. images recorded for the artist,
//! 3. the album recorded for the (artist, title) pair.
//!
//! Each stage fails independently. A file without associations produces a
//! Warning event and tagging moves on to the next stage or file; only a
//! bad target path ends a call early.
//!
//! The tagger does no parallel work of its own. Run it on one background
//! thread and watch the [`EventSink`] for progress. Association changes take
//! `&mut self`, so they cannot overlap a running [`AutoTagger::auto_tag`].

mod options;

pub use options::{AutoTagOptions, CancellationToken};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::apply::{ReplaceMode, apply_album, apply_images};
use crate::associations::{
    AlbumAssociations, Association, AssociationKind, AssociationStore, ImageAssociations,
};
use crate::config::ResourcePaths;
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::naming::{BanList, infer};
use crate::scanner::{display_name, is_audio_file, list_audio_files};
use crate::tags::{Field, LoftyBackend, TagAccess, TagBackend};

/// A new entry for one of the association stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewAssociation {
    Image {
        artist: String,
        name: String,
        path: PathBuf,
    },
    Album {
        artist: String,
        title: String,
        album: String,
    },
}

/// What a directory is associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryAssociation {
    /// Each image file in the directory becomes the image `name` of the
    /// artist named by its file stem
    Image { name: String },
    /// Each tagged audio file in the directory is recorded as part of `album`
    Album { album: String },
}

/// Outcome counts of one [`AutoTagger::auto_tag`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    /// Files opened and processed
    pub files: usize,
    /// Stages skipped for lack of associations or image files
    pub warnings: usize,
    /// Stages or files that failed
    pub errors: usize,
    /// The run stopped early because the token was cancelled
    pub cancelled: bool,
}

pub struct AutoTagger<B = LoftyBackend> {
    paths: ResourcePaths,
    ban_list: BanList,
    images: ImageAssociations,
    albums: AlbumAssociations,
    backend: B,
    sink: Arc<dyn EventSink>,
}

impl<B: TagBackend> AutoTagger<B> {
    /// Load the ban list and both stores from `paths`.
    ///
    /// Each resource is loaded independently; a missing or unreadable one is
    /// reported to `sink` and replaced with an empty default.
    pub fn new(paths: ResourcePaths, backend: B, sink: Arc<dyn EventSink>) -> Self {
        let ban_list = load_or_default("Ban list", &paths.ban_list, BanList::load, &*sink);
        let images = load_or_default(
            "Image associations",
            &paths.image_associations,
            ImageAssociations::load,
            &*sink,
        );
        let albums = load_or_default(
            "Album associations",
            &paths.album_associations,
            AlbumAssociations::load,
            &*sink,
        );

        Self {
            paths,
            ban_list,
            images,
            albums,
            backend,
            sink,
        }
    }

    /// Tag one audio file, or every audio file directly inside a directory.
    ///
    /// In a directory, `cancel` is checked after each file; once raised the
    /// run stops and returns normally with [`TagSummary::cancelled`] set.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if `path` is a file with a
    ///   non-audio extension
    /// - [`Error::PathNotFound`] if `path` is neither a file nor a directory
    ///
    /// Both are also reported to the sink as Fatal events.
    pub fn auto_tag(
        &self,
        path: &Path,
        options: &AutoTagOptions,
        cancel: &CancellationToken,
    ) -> Result<TagSummary> {
        let mut summary = TagSummary::default();

        if path.is_file() {
            if !is_audio_file(path) {
                self.sink.fatal(format!("Not supported type: {}", display_name(path)));
                return Err(Error::UnsupportedFormat(path.to_path_buf()));
            }
            self.tag_file(path, options, &mut summary);
        } else if path.is_dir() {
            let files = list_audio_files(path).inspect_err(|e| {
                self.sink.fatal(format!("Cannot read directory {}: {}", path.display(), e));
            })?;
            for file in files {
                self.tag_file(&file, options, &mut summary);
                if cancel.is_cancelled() {
                    self.sink.info("Auto tagging cancelled".to_string());
                    summary.cancelled = true;
                    break;
                }
            }
        } else {
            self.sink.fatal(format!("No such file or directory: {}", path.display()));
            return Err(Error::PathNotFound(path.to_path_buf()));
        }

        tracing::info!(
            target: "tagger",
            path = %path.display(),
            files = summary.files,
            warnings = summary.warnings,
            errors = summary.errors,
            cancelled = summary.cancelled,
            "Auto tagging finished"
        );
        Ok(summary)
    }

    fn tag_file(&self, path: &Path, options: &AutoTagOptions, summary: &mut TagSummary) {
        let name = display_name(path);
        self.sink.info(format!("Adding tags to: {name}"));

        let mut file = match self.backend.open(path) {
            Ok(file) => file,
            Err(e) => {
                self.sink.error(format!("Failed to open {name}: {e}"));
                summary.errors += 1;
                return;
            }
        };
        summary.files += 1;

        if let Err(e) = self.apply_inferred_name(file.as_mut(), &name, options) {
            self.sink.error(format!("Failed to set artist/title of {name}: {e}"));
            summary.errors += 1;
        }

        // Associations are looked up with what the file holds now, which in
        // fill-if-absent mode may differ from the inferred name. Only the
        // image lookup ignores trailing whitespace; albums match exactly.
        let artist = file.field(Field::Artist).unwrap_or_default();
        let title = file.field(Field::Title).unwrap_or_default();

        match apply_images(file.as_mut(), artist.trim_end(), &self.images, options.image) {
            Ok(written) => {
                tracing::debug!(target: "tagger", file = %name, written, "Images applied");
            }
            Err(Error::NoAssociation { .. }) => {
                self.sink.warning(format!("No image associations for file: {name}"));
                summary.warnings += 1;
            }
            Err(Error::MissingImageFile(image)) => {
                self.sink.warning(format!("Failed to find image: {}", image.display()));
                summary.warnings += 1;
            }
            Err(e) => {
                self.sink.error(format!("Failed to add images to {name}: {e}"));
                summary.errors += 1;
            }
        }

        match apply_album(file.as_mut(), &artist, &title, &self.albums, options.album) {
            Ok(album) => {
                tracing::debug!(target: "tagger", file = %name, ?album, "Album applied");
            }
            Err(Error::NoAssociation { .. }) => {
                self.sink.warning(format!("No album associations for file: {name}"));
                summary.warnings += 1;
            }
            Err(e) => {
                self.sink.error(format!("Failed to set album of {name}: {e}"));
                summary.errors += 1;
            }
        }
    }

    /// In fill-if-absent mode a missing title is filled with the inferred
    /// title, not the inferred artist.
    fn apply_inferred_name(
        &self,
        file: &mut dyn TagAccess,
        file_name: &str,
        options: &AutoTagOptions,
    ) -> Result<()> {
        let inferred = infer(file_name, &self.ban_list);

        if options.artist == ReplaceMode::Always || file.field(Field::Artist).is_none() {
            file.set_field(Field::Artist, &inferred.artist)?;
        }
        if options.title == ReplaceMode::Always || file.field(Field::Title).is_none() {
            file.set_field(Field::Title, &inferred.title)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Association management
    // ------------------------------------------------------------------

    pub fn add_association(&mut self, association: NewAssociation) {
        match association {
            NewAssociation::Image { artist, name, path } => self.images.add(&artist, &name, path),
            NewAssociation::Album {
                artist,
                title,
                album,
            } => self.albums.add(&artist, &title, album),
        }
    }

    /// Record associations for every suitable file directly inside `dir`.
    /// Returns how many were added.
    pub fn associate(&mut self, dir: &Path, target: &DirectoryAssociation) -> Result<usize> {
        match target {
            DirectoryAssociation::Image { name } => {
                self.images.associate_directory(dir, name, &*self.sink)
            }
            DirectoryAssociation::Album { album } => {
                self.albums
                    .associate_directory(dir, album, &self.backend, &*self.sink)
            }
        }
    }

    /// Delete one association. `key` is the association name for images and
    /// the title for albums.
    ///
    /// Image deletes fail with [`Error::AssociationNotFound`] when nothing
    /// matches; album deletes return `Ok(false)` instead.
    pub fn delete_association(
        &mut self,
        kind: AssociationKind,
        artist: &str,
        key: &str,
    ) -> Result<bool> {
        match kind {
            AssociationKind::Image => self.images.delete(artist, key),
            AssociationKind::Album => self.albums.delete(artist, key),
        }
    }

    pub fn list_associations(
        &self,
        kind: AssociationKind,
    ) -> Box<dyn Iterator<Item = Association> + '_> {
        match kind {
            AssociationKind::Image => self.images.list(),
            AssociationKind::Album => self.albums.list(),
        }
    }

    /// Merge a serialized store from `path` into the selected store.
    pub fn update_associations(&mut self, kind: AssociationKind, path: &Path) -> Result<()> {
        match kind {
            AssociationKind::Image => self.images.merge_from(path),
            AssociationKind::Album => self.albums.merge_from(path),
        }
    }

    pub fn clear_associations(&mut self, kind: AssociationKind) {
        match kind {
            AssociationKind::Image => self.images.clear(),
            AssociationKind::Album => self.albums.clear(),
        }
    }

    /// Persist the selected store to its configured resource.
    pub fn save_associations(&self, kind: AssociationKind) -> Result<()> {
        match kind {
            AssociationKind::Image => self.images.save(&self.paths.image_associations),
            AssociationKind::Album => self.albums.save(&self.paths.album_associations),
        }
    }

    // ------------------------------------------------------------------
    // Ban list
    // ------------------------------------------------------------------

    pub fn ban_list(&self) -> &BanList {
        &self.ban_list
    }

    pub fn ban_list_mut(&mut self) -> &mut BanList {
        &mut self.ban_list
    }

    /// Persist the ban list to its configured resource.
    pub fn save_ban_list(&self) -> Result<()> {
        self.ban_list.save(&self.paths.ban_list)
    }

    pub fn image_associations(&self) -> &ImageAssociations {
        &self.images
    }

    pub fn album_associations(&self) -> &AlbumAssociations {
        &self.albums
    }
}

fn load_or_default<T: Default>(
    label: &str,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T>,
    sink: &dyn EventSink,
) -> T {
    match load(path) {
        Ok(value) => {
            sink.info(format!("{label} file loaded."));
            value
        }
        Err(Error::ResourceNotFound(missing)) => {
            sink.warning(format!("{label} file not found: {}", missing.display()));
            T::default()
        }
        Err(e) => {
            sink.error(format!("{label} file could not be loaded: {e}"));
            T::default()
        }
    }
}
