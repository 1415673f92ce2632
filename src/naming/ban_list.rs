//! Ordered list of fragments stripped from file names before parsing.
//!
//! Stored as plain text, one fragment per line. Fragments may contain
//! leading or trailing spaces, so lines are never trimmed beyond the line
//! terminator.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanList {
    fragments: Vec<String>,
}

impl BanList {
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    /// Load a ban list from a line-oriented text file.
    ///
    /// A missing file is reported as [`Error::ResourceNotFound`] so the
    /// caller can fall back to an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ResourceNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let fragments = contents.lines().map(str::to_string).collect();
        Ok(Self { fragments })
    }

    /// Write every fragment followed by a newline, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut contents = String::new();
        for fragment in &self.fragments {
            contents.push_str(fragment);
            contents.push('\n');
        }
        fs::write(path, contents)?;
        tracing::debug!(target: "naming", path = %path.display(), count = self.fragments.len(), "Saved ban list");
        Ok(())
    }

    /// Append a fragment to the end of the list.
    pub fn ban(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Remove the first occurrence of `fragment`. Returns whether one was found.
    pub fn pardon(&mut self, fragment: &str) -> bool {
        match self.fragments.iter().position(|f| f == fragment) {
            Some(index) => {
                self.fragments.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BanList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
