// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource/output handles.
//!
//! The design note on handle back-references calls for an index-based
//! design in an ownership-strict language: each handle stores
//! `(contextId, stateTag, resourceId)` instead of a pointer back into the
//! context, and operations look the id up through the context. We use a
//! lightweight `ContextToken` (a per-context counter value) in place of a
//! full `contextId`/`stateTag` pair — state-snapshot validity is enforced
//! structurally instead, since every operation that consumes a handle takes
//! `&mut BuildContextCore` and checks the id against *current* state.

use ibx_core::ResourceId;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies the context a handle was minted by, without holding a
/// reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextToken(u64);

impl ContextToken {
    pub(crate) fn fresh() -> Self {
        ContextToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a resource tracked by some build context.
///
/// `Resource` and `Output` are aliases of this type: the distinction
/// between "an input I registered" and "an output I declared" is purely in
/// which operations the caller chooses to invoke on the id, not in the
/// handle's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub(crate) token: ContextToken,
    pub(crate) id: ResourceId,
}

impl ResourceMetadata {
    pub(crate) fn new(token: ContextToken, id: ResourceId) -> Self {
        ResourceMetadata { token, id }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}

pub type Resource = ResourceMetadata;
pub type Output = ResourceMetadata;

/// Handle to an aggregate output, returned by `registerOutput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutput(pub(crate) ResourceMetadata);

impl AggregateOutput {
    pub fn id(&self) -> &ResourceId {
        self.0.id()
    }
}

/// An input bound to the base directory it was registered under, assembled
/// by `createIfNecessary` for the `creator` callback.
#[derive(Debug, Clone)]
pub struct AggregateInput {
    pub(crate) resource: ResourceMetadata,
    pub(crate) basedir: PathBuf,
}

impl AggregateInput {
    pub fn id(&self) -> &ResourceId {
        self.resource.id()
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }
}
