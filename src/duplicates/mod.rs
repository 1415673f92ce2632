//! Byte-identical duplicate detection.
//!
//! Runs in two phases so that most files are never hashed:
//!
//! 1. **Size bucketing** - every audio file directly inside the directory is
//!    sized; files whose size is unique cannot have a duplicate and are
//!    dropped.
//! 2. **Hash comparison** - the survivors are hashed with SHA-256 and grouped
//!    by digest. Only groups with two or more members are reported.
//!
//! Only exact content equality counts; there is no fuzzy or acoustic
//! matching.
//!
//! The search works on plain files and never opens a tag container: sizes
//! come from the filesystem and digests from [`file_sha256`], the same
//! helper behind `TagAccess::content_hash`, so both report identical hashes.

mod hash;

pub use hash::file_sha256;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::events::{EventSink, LogSink};
use crate::scanner::{display_name, list_audio_files};

/// Files sharing one content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Lowercase hex SHA-256 shared by every file in the group
    pub hash: String,
    /// At least two paths, sorted
    pub paths: Vec<PathBuf>,
}

/// Find duplicates in `dir`, reporting progress through `tracing`.
pub fn find_duplicates(dir: &Path) -> Result<Vec<DuplicateGroup>> {
    find_duplicates_with(dir, &LogSink)
}

/// Find duplicates in `dir`, reporting progress to `sink`.
///
/// Emits one "Checking" event per audio file, one "Hashing" event per file
/// that survived size bucketing, and one Info event per group found.
/// Groups are ordered by hash.
pub fn find_duplicates_with(dir: &Path, sink: &dyn EventSink) -> Result<Vec<DuplicateGroup>> {
    if !dir.is_dir() {
        sink.fatal(format!("No such directory: {}", dir.display()));
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }

    let candidates = same_size_candidates(dir, sink)?;

    let mut by_hash: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in candidates {
        sink.info(format!("Hashing file: {}", path.display()));
        let hash = file_sha256(&path)?;
        by_hash.entry(hash).or_default().push(path);
    }

    let groups: Vec<DuplicateGroup> = by_hash
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(hash, mut paths)| {
            paths.sort();
            DuplicateGroup { hash, paths }
        })
        .collect();

    for group in &groups {
        let names: Vec<String> = group.paths.iter().map(|p| display_name(p)).collect();
        sink.info(format!("Duplicates [{}]: {}", group.hash, names.join(", ")));
    }

    tracing::debug!(target: "duplicates", dir = %dir.display(), groups = groups.len(), "Duplicate search complete");
    Ok(groups)
}

/// Phase one: size every audio file and keep the ones whose size is shared
/// with at least one other file.
fn same_size_candidates(dir: &Path, sink: &dyn EventSink) -> Result<Vec<PathBuf>> {
    let mut by_size: HashMap<u64, Vec<PathBuf>> = HashMap::new();
    let mut order = Vec::new();

    for path in list_audio_files(dir)? {
        sink.info(format!("Checking: {}", display_name(&path)));
        let size = fs::metadata(&path)?.len();
        by_size.entry(size).or_default().push(path.clone());
        order.push((path, size));
    }
    sink.info("Checking complete".to_string());

    Ok(order
        .into_iter()
        .filter(|(_, size)| by_size.get(size).is_some_and(|paths| paths.len() > 1))
        .map(|(path, _)| path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Severity;
    use crate::test_utils::CollectingSink;
    use tempfile::tempdir;

    #[test]
    fn test_unique_size_is_never_hashed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        let c = dir.path().join("c.mp3");
        fs::write(&a, [1u8; 10]).unwrap();
        fs::write(&b, [1u8; 10]).unwrap();
        fs::write(&c, [1u8; 20]).unwrap();

        let sink = CollectingSink::default();
        let groups = find_duplicates_with(dir.path(), &sink).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec![a.clone(), b.clone()]);
        assert_eq!(groups[0].hash, file_sha256(&a).unwrap());

        let hashed: Vec<String> = sink
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Hashing file: "))
            .collect();
        assert_eq!(hashed.len(), 2);
        assert!(!hashed.iter().any(|m| m.contains("c.mp3")));
    }

    #[test]
    fn test_same_size_different_content_is_not_a_duplicate() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"aaaa").unwrap();
        fs::write(dir.path().join("b.mp3"), b"bbbb").unwrap();

        let groups = find_duplicates_with(dir.path(), &CollectingSink::default()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_several_groups_and_non_audio_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x1.mp3"), b"same-x").unwrap();
        fs::write(dir.path().join("x2.flac"), b"same-x").unwrap();
        fs::write(dir.path().join("y1.mp3"), b"same-yy").unwrap();
        fs::write(dir.path().join("y2.mp3"), b"same-yy").unwrap();
        fs::write(dir.path().join("y3.mp3"), b"same-yy").unwrap();
        fs::write(dir.path().join("notes.txt"), b"same-yy").unwrap();

        let sink = CollectingSink::default();
        let groups = find_duplicates_with(dir.path(), &sink).unwrap();

        let mut sizes: Vec<usize> = groups.iter().map(|g| g.paths.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![2, 3]);
        assert!(!sink.messages().iter().any(|m| m.contains("notes.txt")));

        let reported = sink
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Duplicates ["))
            .count();
        assert_eq!(reported, 2);
    }

    #[test]
    fn test_group_hash_matches_tag_interface_hash() {
        use crate::tags::{LoftyBackend, TagBackend};
        use crate::test_utils::write_silent_wav;

        let dir = tempdir().unwrap();
        let first = dir.path().join("first.wav");
        let second = dir.path().join("second.wav");
        write_silent_wav(&first);
        write_silent_wav(&second);

        let groups = find_duplicates_with(dir.path(), &CollectingSink::default()).unwrap();

        assert_eq!(groups.len(), 1);
        let opened = LoftyBackend.open(&first).unwrap();
        assert_eq!(opened.content_hash().unwrap(), groups[0].hash);
        assert_eq!(opened.size().unwrap(), fs::metadata(&second).unwrap().len());
    }

    #[test]
    fn test_missing_directory() {
        let sink = CollectingSink::default();
        let result = find_duplicates_with(Path::new("no/such/dir"), &sink);

        assert!(matches!(result, Err(Error::PathNotFound(_))));
        assert_eq!(sink.events()[0].severity, Severity::Fatal);
    }

    #[test]
    fn test_default_sink_entry_point() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("only.mp3"), b"alone").unwrap();
        assert!(find_duplicates(dir.path()).unwrap().is_empty());
    }
}
