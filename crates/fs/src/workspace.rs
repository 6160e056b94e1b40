// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FilesystemWorkspace`: the `std::fs`-backed `Workspace` collaborator.
//!
//! The original source's Workspace is built on an IDE-style resource-delta
//! API (Eclipse's `IResourceDelta`/m2e), which can report a file REMOVED
//! during a walk because the host tracks project scope across builds, not
//! because it re-derives that fact from a bare directory listing. A plain
//! `std::fs` backend has no such registry of its own, so this implementation
//! is handed a snapshot of what the previous build knew (`known`, the
//! previous state's `FileState` entries) at construction and diffs the
//! current directory listing against it — the portable equivalent of asking
//! the IDE "what changed since last time."

use ibx_core::{CoreError, ResourceStatus, WorkspaceMode};
use ibx_engine::{WalkEntry, Workspace};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Remembered `(lastModified, length)` for every file the previous build
/// knew about, keyed by absolute path.
pub type KnownFiles = HashMap<PathBuf, (SystemTime, u64)>;

/// The production `Workspace`: walks real directories with `walkdir`, opens
/// real files, and reports change status from `std::fs::Metadata`.
#[derive(Clone)]
pub struct FilesystemWorkspace {
    mode: WorkspaceMode,
    known: Arc<KnownFiles>,
}

impl FilesystemWorkspace {
    pub fn new(mode: WorkspaceMode, known: KnownFiles) -> Self {
        FilesystemWorkspace { mode, known: Arc::new(known) }
    }

    pub fn normal(known: KnownFiles) -> Self {
        Self::new(WorkspaceMode::Normal, known)
    }

    pub fn delta(known: KnownFiles) -> Self {
        Self::new(WorkspaceMode::Delta, known)
    }

    pub fn suppressed(known: KnownFiles) -> Self {
        Self::new(WorkspaceMode::Suppressed, known)
    }

    /// Build the `known` snapshot from a previously persisted `BuildState`,
    /// the shape a host binding actually has on hand after loading the
    /// state file.
    pub fn from_previous_state(mode: WorkspaceMode, previous: &ibx_core::BuildState) -> Self {
        let known = previous
            .resources
            .values()
            .filter_map(|holder| holder.as_file_state())
            .map(|fs| (fs.path.clone(), (fs.last_modified, fs.length)))
            .collect();
        Self::new(mode, known)
    }

    fn scan(&self, basedir: &Path) -> Result<Vec<(PathBuf, SystemTime, u64)>, CoreError> {
        let mut out = Vec::new();
        for entry in WalkDir::new(basedir).into_iter() {
            let entry = entry.map_err(|e| {
                CoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = entry.metadata().map_err(|e| {
                CoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            let last_modified = metadata.modified()?;
            out.push((entry.path().to_path_buf(), last_modified, metadata.len()));
        }
        Ok(out)
    }
}

impl Workspace for FilesystemWorkspace {
    fn mode(&self) -> WorkspaceMode {
        self.mode
    }

    fn escalate(&self) -> Self {
        FilesystemWorkspace { mode: WorkspaceMode::Escalated, known: Arc::clone(&self.known) }
    }

    fn walk(
        &self,
        basedir: &Path,
        visitor: &mut dyn FnMut(WalkEntry) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let scanned = self.scan(basedir)?;
        let mut seen: std::collections::HashSet<&Path> = std::collections::HashSet::new();

        for (path, last_modified, length) in &scanned {
            seen.insert(path.as_path());
            let remembered = self.known.get(path);

            let status = match self.mode {
                WorkspaceMode::Delta => match remembered {
                    None => Some(ResourceStatus::New),
                    Some((mtime, len)) if mtime != last_modified || len != length => {
                        Some(ResourceStatus::Modified)
                    }
                    Some(_) => None,
                },
                _ => Some(ResourceStatus::New),
            };

            if let Some(status) = status {
                visitor(WalkEntry {
                    path: path.clone(),
                    last_modified: *last_modified,
                    length: *length,
                    status,
                })?;
            }
        }

        // Anything the previous build knew about, under this basedir, that
        // the scan didn't turn up has been deleted.
        for path in self.known.keys() {
            if path.starts_with(basedir) && !seen.contains(path.as_path()) {
                visitor(WalkEntry {
                    path: path.clone(),
                    last_modified: SystemTime::UNIX_EPOCH,
                    length: 0,
                    status: ResourceStatus::Removed,
                })?;
            }
        }

        Ok(())
    }

    fn is_present(&self, path: &Path) -> Result<bool, CoreError> {
        Ok(path.exists())
    }

    fn resource_status(
        &self,
        path: &Path,
        remembered_mtime: SystemTime,
        remembered_len: u64,
    ) -> Result<ResourceStatus, CoreError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ResourceStatus::Removed),
            Err(e) => return Err(e.into()),
        };
        let last_modified = metadata.modified()?;
        let length = metadata.len();
        if last_modified != remembered_mtime || length != remembered_len {
            Ok(ResourceStatus::Modified)
        } else {
            Ok(ResourceStatus::Unmodified)
        }
    }

    fn new_output_stream(&self, path: &Path) -> Result<Box<dyn Write>, CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Box::new(File::create(path)?))
    }

    fn delete_file(&self, path: &Path) -> Result<(), CoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn stat(&self, path: &Path) -> Result<(SystemTime, u64), CoreError> {
        let metadata = fs::metadata(path)?;
        Ok((metadata.modified()?, metadata.len()))
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
