//! Whole-file content hashing.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Compute the SHA-256 of the entire file.
///
/// The file is streamed, so memory use stays constant for large files.
///
/// # Returns
///
/// SHA256 hash as a lowercase hex string (64 characters)
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn file_sha256(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
