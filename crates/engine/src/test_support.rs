// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`Workspace`] test double, so unit tests can exercise
//! registration/processing/commit without touching disk. The production
//! implementation lives in `ibx-fs`, backed by `walkdir` and `std::fs`.

use ibx_core::{CoreError, ResourceStatus, WorkspaceMode};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::workspace_trait::{WalkEntry, Workspace};

#[derive(Debug, Clone)]
struct FileRecord {
    content: Vec<u8>,
    last_modified: SystemTime,
}

#[derive(Default)]
struct Inner {
    files: HashMap<PathBuf, FileRecord>,
    /// Paths written or removed since the last `begin_build`, used to drive
    /// DELTA mode's "only changed files are visited" contract.
    dirty: HashSet<PathBuf>,
}

/// A fake `Workspace` whose files live in memory.
///
/// `Clone` shares the same backing store (an `Arc<Mutex<Inner>>`), so a test
/// can construct a fresh context per simulated build while reusing the same
/// workspace across builds — exactly as the filesystem reference
/// implementation's `Workspace` instances do across process invocations.
#[derive(Clone)]
pub struct FakeWorkspace {
    mode: WorkspaceMode,
    inner: Arc<Mutex<Inner>>,
}

impl FakeWorkspace {
    pub fn new(mode: WorkspaceMode) -> Self {
        FakeWorkspace { mode, inner: Arc::new(Mutex::new(Inner::default())) }
    }

    pub fn normal() -> Self {
        Self::new(WorkspaceMode::Normal)
    }

    pub fn delta() -> Self {
        Self::new(WorkspaceMode::Delta)
    }

    pub fn suppressed() -> Self {
        Self::new(WorkspaceMode::Suppressed)
    }

    /// Mark the current dirty set consumed, as though a DELTA walk had just
    /// observed it. Call this between simulated builds.
    pub fn begin_build(&self) {
        self.inner.lock().dirty.clear();
    }

    pub fn write_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut inner = self.inner.lock();
        inner
            .files
            .insert(path.clone(), FileRecord { content: content.into(), last_modified: SystemTime::now() });
        inner.dirty.insert(path);
    }

    pub fn remove_file_for_test(&self, path: &Path) {
        let mut inner = self.inner.lock();
        inner.files.remove(path);
        inner.dirty.insert(path.to_path_buf());
    }

    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.lock().files.get(path).map(|r| r.content.clone())
    }
}

impl Workspace for FakeWorkspace {
    fn mode(&self) -> WorkspaceMode {
        self.mode
    }

    fn escalate(&self) -> Self {
        FakeWorkspace { mode: WorkspaceMode::Escalated, inner: Arc::clone(&self.inner) }
    }

    fn walk(
        &self,
        basedir: &Path,
        visitor: &mut dyn FnMut(WalkEntry) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let inner = self.inner.lock();
        let candidate_paths: Box<dyn Iterator<Item = &PathBuf>> = match self.mode {
            WorkspaceMode::Delta => Box::new(inner.dirty.iter()),
            _ => Box::new(inner.files.keys()),
        };
        let mut paths: Vec<&PathBuf> = candidate_paths.filter(|p| p.starts_with(basedir)).collect();
        paths.sort();

        for path in paths {
            match inner.files.get(path) {
                Some(record) => visitor(WalkEntry {
                    path: path.clone(),
                    last_modified: record.last_modified,
                    length: record.content.len() as u64,
                    status: ResourceStatus::New,
                })?,
                None => visitor(WalkEntry {
                    path: path.clone(),
                    last_modified: SystemTime::UNIX_EPOCH,
                    length: 0,
                    status: ResourceStatus::Removed,
                })?,
            }
        }
        Ok(())
    }

    fn is_present(&self, path: &Path) -> Result<bool, CoreError> {
        Ok(self.inner.lock().files.contains_key(path))
    }

    fn resource_status(
        &self,
        path: &Path,
        remembered_mtime: SystemTime,
        remembered_len: u64,
    ) -> Result<ResourceStatus, CoreError> {
        let inner = self.inner.lock();
        match inner.files.get(path) {
            None => Ok(ResourceStatus::Removed),
            Some(record) => {
                if record.last_modified != remembered_mtime || record.content.len() as u64 != remembered_len {
                    Ok(ResourceStatus::Modified)
                } else {
                    Ok(ResourceStatus::Unmodified)
                }
            }
        }
    }

    fn new_output_stream(&self, path: &Path) -> Result<Box<dyn Write>, CoreError> {
        Ok(Box::new(FakeOutputStream {
            path: path.to_path_buf(),
            inner: Arc::clone(&self.inner),
            buffer: Vec::new(),
        }))
    }

    fn delete_file(&self, path: &Path) -> Result<(), CoreError> {
        let mut inner = self.inner.lock();
        inner.files.remove(path);
        inner.dirty.insert(path.to_path_buf());
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<(SystemTime, u64), CoreError> {
        let inner = self.inner.lock();
        let record = inner
            .files
            .get(path)
            .ok_or_else(|| CoreError::invalid_argument(format!("no such file: {}", path.display())))?;
        Ok((record.last_modified, record.content.len() as u64))
    }
}

struct FakeOutputStream {
    path: PathBuf,
    inner: Arc<Mutex<Inner>>,
    buffer: Vec<u8>,
}

impl Write for FakeOutputStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for FakeOutputStream {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.files.insert(
            self.path.clone(),
            FileRecord { content: std::mem::take(&mut self.buffer), last_modified: SystemTime::now() },
        );
        inner.dirty.insert(self.path.clone());
    }
}
