// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logger capability for testable diagnostic output.
//!
//! The source this engine is distilled from acquires a process-wide logger
//! by type. We pass a logger capability into the context at construction
//! instead, the same way [`crate::config`]'s clock-style collaborators are
//! injected rather than reached for ambiently.

use crate::message::{Message, Severity};
use parking_lot::Mutex;
use std::sync::Arc;

/// Destination for diagnostics the engine emits outside of `MessageSink`
/// replay: escalation reasons, carried-over message replay, commit summaries.
pub trait Logger: Send + Sync {
    fn log(&self, severity: Severity, text: &str);

    fn info(&self, text: &str) {
        self.log(Severity::Info, text);
    }

    fn warn(&self, text: &str) {
        self.log(Severity::Warning, text);
    }

    fn error(&self, text: &str) {
        self.log(Severity::Error, text);
    }

    /// Replay a message attached to a resource in a previous build. Default
    /// formatting matches the `path:[line:col] text` shape used for build
    /// failure summaries.
    fn replay(&self, path: &str, message: &Message) {
        self.log(
            message.severity,
            &format!("{}:[{}:{}] {}", path, message.line, message.column, message.text),
        );
    }
}

/// Production logger backed by the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Info => tracing::info!("{text}"),
            Severity::Warning => tracing::warn!("{text}"),
            Severity::Error => tracing::error!("{text}"),
        }
    }
}

/// Captures emitted lines in memory so tests can assert on them.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far, in emission order.
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(text))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, severity: Severity, text: &str) {
        self.lines.lock().push((severity, text.to_string()));
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
