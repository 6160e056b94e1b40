// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Workspace` and `MessageSink` collaborator interfaces the engine
//! consumes. Concrete implementations (a filesystem-backed `Workspace`, an
//! in-memory one for tests) live outside this crate — `ibx-fs` for the
//! production one, [`crate::test_support`] for the fake.

use ibx_core::{CoreError, ResourceId, ResourceStatus};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One file the workspace visited during a walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub last_modified: SystemTime,
    pub length: u64,
    pub status: ResourceStatus,
}

/// The I/O and change-detection collaborator.
///
/// `escalate()` takes `&self` and returns an owned `Self` rather than
/// mutating in place, since escalating is a one-way transition the context
/// performs once at construction and the result replaces the field
/// wholesale — matching `spec.md`'s "workspace = workspace.escalate()".
pub trait Workspace: Sized {
    fn mode(&self) -> ibx_core::WorkspaceMode;

    fn escalate(&self) -> Self;

    /// Visit every file this build cares about under `basedir`. The
    /// visitor returns `Err` to abort the walk early (propagated to the
    /// caller of `walk`).
    fn walk(
        &self,
        basedir: &Path,
        visitor: &mut dyn FnMut(WalkEntry) -> Result<(), CoreError>,
    ) -> Result<(), CoreError>;

    fn is_present(&self, path: &Path) -> Result<bool, CoreError>;

    /// Classify `path` against a remembered `(lastModified, length)`.
    fn resource_status(
        &self,
        path: &Path,
        remembered_mtime: SystemTime,
        remembered_len: u64,
    ) -> Result<ResourceStatus, CoreError>;

    /// Open an output stream, creating parent directories as needed.
    fn new_output_stream(&self, path: &Path) -> Result<Box<dyn std::io::Write>, CoreError>;

    fn delete_file(&self, path: &Path) -> Result<(), CoreError>;

    /// Current `(lastModified, length)` for a single already-present path.
    ///
    /// Not named in the walker/visitor contract above, but required by it:
    /// `registerInput` and `processOutput` both need a fresh stat for
    /// exactly one path, and re-walking an entire directory to answer a
    /// single-file question would be wasteful.
    fn stat(&self, path: &Path) -> Result<(SystemTime, u64), CoreError>;
}

/// Diagnostics sink notified at commit.
pub trait MessageSink {
    /// Forget any previously reported diagnostics for `id` — called once
    /// per id in `processedResources` before `record`.
    fn clear(&mut self, id: &ResourceId);

    /// Deliver the full set of current diagnostics and the subset that's
    /// new this build.
    fn record(
        &mut self,
        all_messages: &ibx_core::MessageBundle,
        new_messages: &ibx_core::MessageBundle,
    );
}
