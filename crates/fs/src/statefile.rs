// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk codec for `BuildState`: `serde_json` framed in `zstd`, written
//! atomically (temp file alongside the target, fsync, rename).
//!
//! A missing or unreadable state file is not an error the caller needs to
//! branch on — `load_state` reports it as `Ok(None)`, "no previous state",
//! which is exactly the condition that drives the context's from-scratch
//! escalation path (`spec.md` §6's sole forwards-compatibility rule: decode
//! failure loses history, never correctness).

use ibx_core::BuildState;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode build state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode build state: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Load the previously persisted state, or `None` if the file is absent or
/// unreadable. A corrupt file is logged and treated the same as absent —
/// the caller escalates to a from-scratch build rather than propagating a
/// hard error.
pub fn load_state(path: &Path) -> Result<Option<BuildState>, StateFileError> {
    let compressed = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let json = match zstd::stream::decode_all(compressed.as_slice()) {
        Ok(json) => json,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file is not valid zstd, discarding");
            return Ok(None);
        }
    };

    match serde_json::from_slice(&json) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file does not decode, discarding");
            Ok(None)
        }
    }
}

/// Persist `state` to `path`, replacing it atomically. The temp file lives
/// next to `path` so the final rename stays on one filesystem.
pub fn save_state(path: &Path, state: &BuildState) -> Result<(), StateFileError> {
    let json = serde_json::to_vec(state).map_err(StateFileError::Encode)?;
    let compressed = zstd::stream::encode_all(json.as_slice(), ZSTD_LEVEL)?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let tmp_path = dir.join(match path.file_name() {
        Some(name) => format!(".{}.tmp", name.to_string_lossy()),
        None => ".state.tmp".to_string(),
    });

    let mut file = File::create(&tmp_path)?;
    file.write_all(&compressed)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "statefile_tests.rs"]
mod tests;
