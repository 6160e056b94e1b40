// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the incremental build engine.
//!
//! Four of the five kinds in the design (`InvalidArgument`, `InvalidState`,
//! `IOFailure`, `InconsistentResource`) are programming errors or I/O
//! failures that fail fast; `BuildFailure` is the one raised deliberately at
//! the end of a successful `commit`, after all carry-over and persistence
//! have already happened.

use thiserror::Error;

/// Errors surfaced by the core build context API.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller passed a null/absent required argument, registered a
    /// resource not present in the workspace, processed a handle bound to a
    /// different context, associated handles from different contexts, or
    /// tried to delete a file that isn't a known output.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted in a state that forbids it: marking skip
    /// after processing has already occurred, or any mutation after the
    /// context has closed.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Propagated from the `Workspace` collaborator: walk, stream open or
    /// close, delete, or state persistence.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Raised at the end of `commit` when no message sink was configured
    /// and at least one ERROR-severity message was recorded this build.
    #[error("build failed:\n{summary}")]
    BuildFailure {
        /// One `path:[line:col] text` line per error-severity message.
        summary: String,
    },

    /// Re-registering a resource id with a holder that differs from one
    /// already on record, where replacement is not permitted (inputs;
    /// outputs are always replace-permitted).
    #[error("inconsistent resource {id}: {reason}")]
    InconsistentResource { id: String, reason: String },
}

impl CoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CoreError::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        CoreError::InvalidState(msg.into())
    }

    pub fn inconsistent_resource(id: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InconsistentResource { id: id.into(), reason: reason.into() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
