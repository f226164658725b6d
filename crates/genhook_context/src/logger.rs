//! Logger seam of the generation context.
//!
//! The context owns one [`GenerationLogger`]. The event wrapper reports every
//! swallowed failure through it, so hosts decide where diagnostics go:
//!
//! - [`TracingLogger`] (the default) forwards entries to `tracing`.
//! - [`MemoryLogger`] keeps entries in memory for inspection.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::Level;

/// Sink for diagnostics emitted during a generation run.
///
/// Every entry carries a human-readable message and a structured payload.
pub trait GenerationLogger: Send + Sync + 'static {
    /// Records one entry.
    fn log(&self, level: Level, message: &str, payload: &Value);

    /// Records an error-level entry.
    fn error(&self, message: &str, payload: &Value) {
        self.log(Level::ERROR, message, payload);
    }

    /// Records a warning-level entry.
    fn warn(&self, message: &str, payload: &Value) {
        self.log(Level::WARN, message, payload);
    }

    /// Records an info-level entry.
    fn info(&self, message: &str, payload: &Value) {
        self.log(Level::INFO, message, payload);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingLogger
// ─────────────────────────────────────────────────────────────────────────────

/// Logger that emits `tracing` events under the `genhook` target.
///
/// The payload is attached as the `payload` field, rendered as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl GenerationLogger for TracingLogger {
    fn log(&self, level: Level, message: &str, payload: &Value) {
        // `tracing` macros need a constant level.
        match level {
            Level::ERROR => tracing::error!(target: "genhook", payload = %payload, "{message}"),
            Level::WARN => tracing::warn!(target: "genhook", payload = %payload, "{message}"),
            Level::INFO => tracing::info!(target: "genhook", payload = %payload, "{message}"),
            Level::DEBUG => tracing::debug!(target: "genhook", payload = %payload, "{message}"),
            _ => tracing::trace!(target: "genhook", payload = %payload, "{message}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryLogger
// ─────────────────────────────────────────────────────────────────────────────

/// One entry recorded by a [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Severity of the entry.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// Structured payload.
    pub payload: Value,
}

/// Logger that records entries in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    /// Creates an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Returns the error-level entries, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == Level::ERROR)
            .cloned()
            .collect()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl GenerationLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str, payload: &Value) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_owned(),
            payload: payload.clone(),
        });
    }
}
