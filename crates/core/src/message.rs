// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic messages attached to resources.

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity of a diagnostic message.
///
/// Ordered so a single `>=` comparison tells commit whether a build failure
/// summary is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

crate::simple_display! {
    Severity {
        Info => "info",
        Warning => "warning",
        Error => "error",
    }
}

/// A single diagnostic attached to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub line: u32,
    pub column: u32,
    pub text: String,
    pub severity: Severity,
    /// Optional formatted cause (e.g. a nested error's display string); the
    /// source models this as an opaque `Throwable`, which has no portable
    /// equivalent, so we carry its formatted text instead.
    pub cause: Option<String>,
}

impl Message {
    /// Render as `path:[line:col] text`, the shape `BuildFailure`'s summary
    /// and message replay both use.
    pub fn format_with_path(&self, path: &str) -> String {
        format!("{}:[{}:{}] {}", path, self.line, self.column, self.text)
    }
}

/// Resource → ordered sequence of messages, keyed by resource id.
///
/// An ordered `Vec` per resource preserves insertion order, since the
/// record of diagnostics for a resource is itself ordered.
pub type MessageBundle = HashMap<ResourceId, Vec<Message>>;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
