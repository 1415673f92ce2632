//! Auto tagging command.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use tokio::runtime::Runtime;

use crate::apply::ReplaceMode;
use crate::config::Config;
use crate::events::{Severity, TagEvent};
use crate::tagger::{AutoTagOptions, AutoTagger, CancellationToken};
use crate::tags::LoftyBackend;

/// Fields switched to fill-if-absent on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillFlags {
    pub artist: bool,
    pub title: bool,
    pub image: bool,
    pub album: bool,
}

impl FillFlags {
    /// Apply the flags on top of the configured defaults.
    fn apply(self, mut options: AutoTagOptions) -> AutoTagOptions {
        let fill = |flag: bool, mode: &mut ReplaceMode| {
            if flag {
                *mode = ReplaceMode::IfAbsent;
            }
        };
        fill(self.artist, &mut options.artist);
        fill(self.title, &mut options.title);
        fill(self.image, &mut options.image);
        fill(self.album, &mut options.album);
        options
    }
}

/// Tag a file or directory. Ctrl+C stops a directory run after the file
/// being processed.
pub fn cmd_tag(config: Config, path: &Path, flags: FillFlags) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let options = flags.apply(config.tagging);

    let (tx, rx) = crossbeam_channel::unbounded::<TagEvent>();
    let printer = thread::spawn(move || print_events(rx));

    let token = CancellationToken::new();
    let tagger = AutoTagger::new(config.resources, LoftyBackend, Arc::new(tx));
    let target = path.to_path_buf();
    let cancel = token.clone();

    let joined = rt.block_on(async {
        let mut task =
            tokio::task::spawn_blocking(move || tagger.auto_tag(&target, &options, &cancel));

        tokio::select! {
            joined = &mut task => joined,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Stopping after the current file...");
                token.cancel();
                task.await
            }
        }
    });

    // The tagger (and with it the last sender) is gone once the task ends
    if printer.join().is_err() {
        tracing::warn!(target: "cli", "Event printer thread panicked");
    }

    let summary = joined??;
    println!();
    println!(
        "Tagged {} file(s): {} warning(s), {} error(s){}",
        summary.files,
        summary.warnings,
        summary.errors,
        if summary.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

fn print_events(rx: Receiver<TagEvent>) {
    for event in rx {
        match event.severity {
            Severity::Info => println!("{event}"),
            Severity::Warning | Severity::Error | Severity::Fatal => eprintln!("{event}"),
        }
    }
}
