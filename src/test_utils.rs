//! Test utilities and fixtures for tag-minder tests.
//!
//! Provides an in-memory [`TagBackend`] so the tagging engine can be
//! exercised against empty placeholder files, a sink that records every
//! event, and a fixture writer for a tiny valid WAV file.
//!
//! # Example
//!
//! ```ignore
//! let backend = MemoryBackend::default();
//! backend.insert(dir.path().join("a.mp3"), MemoryTags::default());
//! let sink = Arc::new(CollectingSink::default());
//! // ... run the engine, then inspect backend.tags(..) and sink.messages()
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::duplicates::file_sha256;
use crate::error::{Error, Result};
use crate::events::{EventSink, Severity, TagEvent};
use crate::scanner::is_audio_file;
use crate::tags::{Field, ImageSelector, TagAccess, TagBackend};

/// Sink that keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TagEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<TagEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Messages of events at exactly `severity`.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: TagEvent) {
        self.events.lock().push(event);
    }
}

/// Tag state of one in-memory file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTags {
    pub fields: HashMap<Field, String>,
    /// (association name, bytes), in insertion order
    pub images: Vec<(String, Vec<u8>)>,
}

impl MemoryTags {
    pub fn with_field(mut self, field: Field, value: &str) -> Self {
        self.fields.insert(field, value.to_string());
        self
    }

    pub fn with_image(mut self, name: &str, data: &[u8]) -> Self {
        self.images.push((name.to_string(), data.to_vec()));
        self
    }

    pub fn image(&self, name: &str) -> Option<&[u8]> {
        self.images
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }
}

/// Backend whose tags live in a shared map keyed by path.
///
/// Hashes and sizes still come from the real file on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    files: Arc<Mutex<HashMap<PathBuf, MemoryTags>>>,
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemoryBackend {
    pub fn insert(&self, path: impl Into<PathBuf>, tags: MemoryTags) {
        self.files.lock().insert(path.into(), tags);
    }

    /// Current tags of `path` (empty when never written).
    pub fn tags(&self, path: &Path) -> MemoryTags {
        self.files.lock().get(path).cloned().unwrap_or_default()
    }

    /// Every path passed to `open`, in call order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().clone()
    }
}

impl TagBackend for MemoryBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn TagAccess>> {
        if !is_audio_file(path) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }
        self.opened.lock().push(path.to_path_buf());
        Ok(Box::new(MemoryFile {
            path: path.to_path_buf(),
            files: Arc::clone(&self.files),
        }))
    }
}

struct MemoryFile {
    path: PathBuf,
    files: Arc<Mutex<HashMap<PathBuf, MemoryTags>>>,
}

impl MemoryFile {
    fn update(&self, f: impl FnOnce(&mut MemoryTags)) {
        let mut files = self.files.lock();
        f(files.entry(self.path.clone()).or_default());
    }
}

impl TagAccess for MemoryFile {
    fn field(&self, field: Field) -> Option<String> {
        self.files
            .lock()
            .get(&self.path)
            .and_then(|t| t.fields.get(&field).cloned())
            .filter(|v| !v.is_empty())
    }

    fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.update(|t| {
            t.fields.insert(field, value.to_string());
        });
        Ok(())
    }

    fn image(&self, name: Option<&str>) -> Result<Vec<u8>> {
        let files = self.files.lock();
        let images = files.get(&self.path).map(|t| t.images.as_slice()).unwrap_or_default();
        let found = match name {
            Some(name) => images.iter().find(|(n, _)| n == name),
            None => images.first(),
        };
        found
            .map(|(_, data)| data.clone())
            .ok_or_else(|| Error::ImageNotFound {
                name: name.map(str::to_string),
            })
    }

    fn set_image(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        self.update(|t| {
            t.images.retain(|(n, _)| n != name);
            t.images.push((name.to_string(), data));
        });
        Ok(())
    }

    fn delete_image(&mut self, target: ImageSelector<'_>) -> Result<()> {
        self.update(|t| match target {
            ImageSelector::Named(name) => t.images.retain(|(n, _)| n != name),
            ImageSelector::All => t.images.clear(),
        });
        Ok(())
    }

    fn content_hash(&self) -> Result<String> {
        Ok(file_sha256(&self.path)?)
    }

    fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }
}

/// Write a 0.1 second, 8 kHz, mono, 16-bit PCM WAV file of silence.
pub fn write_silent_wav(path: &Path) {
    const SAMPLE_RATE: u32 = 8000;
    const DATA_LEN: u32 = 1600;

    let mut bytes = Vec::with_capacity(44 + DATA_LEN as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + DATA_LEN).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&DATA_LEN.to_le_bytes());
    bytes.resize(44 + DATA_LEN as usize, 0);

    fs::write(path, bytes).expect("Failed to write WAV fixture");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_backend_shares_state_between_handles() {
        let backend = MemoryBackend::default();
        let path = PathBuf::from("/music/a.mp3");

        let mut file = backend.open(&path).unwrap();
        file.set_field(Field::Artist, "Queen").unwrap();
        file.set_image("Front", vec![1, 2]).unwrap();

        let tags = backend.tags(&path);
        assert_eq!(tags.fields.get(&Field::Artist).map(String::as_str), Some("Queen"));
        assert_eq!(tags.image("Front"), Some(&[1u8, 2][..]));
        assert_eq!(backend.opened(), vec![path]);
    }

    #[test]
    fn test_memory_backend_rejects_unsupported() {
        let backend = MemoryBackend::default();
        assert!(matches!(
            backend.open(Path::new("cover.jpg")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_write_silent_wav_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_silent_wav(&path);
        assert_eq!(fs::metadata(&path).unwrap().len(), 44 + 1600);
    }
}
