// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource identity and the polymorphic-over-variant `ResourceHolder`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of a tracked resource: its absolute, canonicalized path.
///
/// Canonicalization falls back to the absolute path if symlink resolution
/// fails (e.g. the file has already been deleted by the time we look).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(PathBuf);

impl ResourceId {
    /// Canonicalize `path`, falling back to its absolute form.
    pub fn canonicalize(path: &Path) -> std::io::Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let canonical = std::fs::canonicalize(&absolute).unwrap_or(absolute);
        Ok(ResourceId(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ResourceId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Classification of a resource's change status relative to the previous
/// build, per the rules in `getResourceStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceStatus {
    New,
    Modified,
    Unmodified,
    Removed,
}

crate::simple_display! {
    ResourceStatus {
        New => "new",
        Modified => "modified",
        Unmodified => "unmodified",
        Removed => "removed",
    }
}

impl ResourceStatus {
    pub fn is_unmodified(self) -> bool {
        matches!(self, ResourceStatus::Unmodified)
    }
}

/// Mode the collaborator `Workspace` is operating in for this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceMode {
    Normal,
    Delta,
    Suppressed,
    Escalated,
}

crate::simple_display! {
    WorkspaceMode {
        Normal => "normal",
        Delta => "delta",
        Suppressed => "suppressed",
        Escalated => "escalated",
    }
}

/// Remembered (lastModified, length) for a plain file resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileState {
    pub path: PathBuf,
    pub last_modified: SystemTime,
    pub length: u64,
}

/// Records the information needed to decide whether a resource has changed.
///
/// `FileState` is the only concrete variant in scope (per the design note
/// on polymorphism over `ResourceHolder`); the enum shape leaves room for
/// additional variants to be added without touching call sites that match
/// on `status()` semantics rather than the variant itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ResourceHolder {
    FileState(FileState),
}

impl ResourceHolder {
    pub fn file(path: PathBuf, last_modified: SystemTime, length: u64) -> Self {
        ResourceHolder::FileState(FileState { path, last_modified, length })
    }

    pub fn as_file_state(&self) -> Option<&FileState> {
        match self {
            ResourceHolder::FileState(fs) => Some(fs),
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
