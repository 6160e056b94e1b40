// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ibx-fs: the filesystem reference implementation of the `Workspace`
//! collaborator (`ibx_engine::Workspace`), plus the on-disk codec for the
//! persisted `BuildState`.
//!
//! Neither piece is part of the core engine (`spec.md` §1 scopes the
//! concrete Workspace and the wire format out as collaborators); this crate
//! exists because a complete, usable crate needs at least one working
//! backend, the same way the teacher workspace pairs its engine crate with a
//! concrete adapter crate.

pub mod statefile;
pub mod workspace;

pub use statefile::{load_state, save_state, StateFileError};
pub use workspace::FilesystemWorkspace;
