//! Per-run tagging options and the cancellation token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::apply::ReplaceMode;

/// Replace mode for each field the tagger can fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTagOptions {
    pub artist: ReplaceMode,
    pub title: ReplaceMode,
    pub image: ReplaceMode,
    pub album: ReplaceMode,
}

impl AutoTagOptions {
    /// Every field in fill-if-absent mode.
    pub fn fill_only() -> Self {
        Self {
            artist: ReplaceMode::IfAbsent,
            title: ReplaceMode::IfAbsent,
            image: ReplaceMode::IfAbsent,
            album: ReplaceMode::IfAbsent,
        }
    }
}

/// Cooperative stop signal for a directory run.
///
/// Clones share the same flag. The tagger checks it once after each file,
/// never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
