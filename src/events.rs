//! Progress and error events emitted by the tagging engine.
//!
//! The engine never renders anything itself. Every outcome it wants a user
//! to see is pushed into an [`EventSink`]; the presentation layer decides
//! how to show it.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// How serious an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    /// The current call cannot continue at all
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        };
        f.write_str(label)
    }
}

/// A single human-readable progress or error event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    pub severity: Severity,
    pub message: String,
}

impl TagEvent {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for TagEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receiver of engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TagEvent);

    fn info(&self, message: String) {
        self.emit(TagEvent::new(Severity::Info, message));
    }

    fn warning(&self, message: String) {
        self.emit(TagEvent::new(Severity::Warning, message));
    }

    fn error(&self, message: String) {
        self.emit(TagEvent::new(Severity::Error, message));
    }

    fn fatal(&self, message: String) {
        self.emit(TagEvent::new(Severity::Fatal, message));
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: TagEvent) {
        (**self).emit(event);
    }
}

/// Default sink: renders events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: TagEvent) {
        match event.severity {
            Severity::Info => tracing::info!(target: "tagger", "{}", event.message),
            Severity::Warning => tracing::warn!(target: "tagger", "{}", event.message),
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: "tagger", severity = %event.severity, "{}", event.message)
            }
        }
    }
}

/// Streams events to another thread. A closed receiver drops events.
impl EventSink for crossbeam_channel::Sender<TagEvent> {
    fn emit(&self, event: TagEvent) {
        // Receiver gone means nobody is listening anymore
        let _ = self.send(event);
    }
}

/// Writes one `[Severity] message` line per event to a writer shared behind
/// a single lock.
///
/// Clones share the same writer, so output from concurrent callers never
/// interleaves within a line.
pub struct LockedWriter<W> {
    out: Arc<Mutex<W>>,
}

impl<W> Clone for LockedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: Write + Send> LockedWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Run `f` with exclusive access to the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut guard = self.out.lock();
        f(&mut guard)
    }
}

impl<W: Write + Send> EventSink for LockedWriter<W> {
    fn emit(&self, event: TagEvent) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{event}") {
            tracing::warn!(target: "tagger", error = %e, "Failed to write progress event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = TagEvent::new(Severity::Warning, "No image associations");
        assert_eq!(event.to_string(), "[Warning] No image associations");
    }

    #[test]
    fn test_locked_writer_renders_lines() {
        let sink = LockedWriter::new(Vec::new());
        sink.info("first".to_string());
        sink.clone().fatal("second".to_string());

        let text = sink.with_writer(|buf| String::from_utf8(buf.clone()).unwrap());
        assert_eq!(text, "[Info] first\n[Fatal] second\n");
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.error("boom".to_string());
        let event = rx.try_recv().unwrap();
        assert_eq!(event.severity, Severity::Error);
        assert_eq!(event.message, "boom");
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded::<TagEvent>();
        drop(rx);
        tx.info("nobody listening".to_string());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Fatal);
    }
}
