//! Injected diagnostics sink.
//!
//! The rasterizer never aborts a frame on bad input. Problems are reported to a
//! [`Diagnostics`] implementation handed to the renderer at construction and the
//! offending draw call degrades to a no-op.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub use tracing::Level;

/// Receiver for renderer diagnostics.
pub trait Diagnostics: Send + Sync {
    /// Report one message at `level`.
    fn emit(&self, level: Level, message: &str);
}

/// Default sink: forwards every message to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "swf_raster", "{message}"),
            Level::WARN => tracing::warn!(target: "swf_raster", "{message}"),
            Level::INFO => tracing::info!(target: "swf_raster", "{message}"),
            Level::DEBUG => tracing::debug!(target: "swf_raster", "{message}"),
            Level::TRACE => tracing::trace!(target: "swf_raster", "{message}"),
        }
    }
}

/// One message captured by [`MemoryDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// Severity.
    pub level: Level,
    /// Rendered message.
    pub message: String,
}

/// Sink that keeps every message in memory. Useful in tests.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemoryDiagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured messages in emission order.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of captured messages at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.records().iter().filter(|r| r.level == level).count()
    }

    /// Return `true` if any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(needle))
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(DiagnosticRecord {
                level,
                message: message.to_owned(),
            });
        }
    }
}

/// Per-renderer handle on the sink with "log once" bookkeeping.
pub(crate) struct DiagnosticsLog {
    sink: Arc<dyn Diagnostics>,
    once: HashSet<&'static str>,
}

impl DiagnosticsLog {
    pub(crate) fn new(sink: Arc<dyn Diagnostics>) -> Self {
        Self {
            sink,
            once: HashSet::new(),
        }
    }

    pub(crate) fn error(&self, message: &str) {
        self.sink.emit(Level::ERROR, message);
    }

    pub(crate) fn warn(&self, message: &str) {
        self.sink.emit(Level::WARN, message);
    }

    pub(crate) fn debug(&self, message: &str) {
        self.sink.emit(Level::DEBUG, message);
    }

    /// Emit `message` only the first time `key` is seen by this renderer.
    pub(crate) fn once(&mut self, key: &'static str, level: Level, message: &str) {
        if self.once.insert(key) {
            self.sink.emit(level, message);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
