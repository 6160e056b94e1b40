// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ibx-engine: the incremental build context state machine.
//!
//! [`context::BuildContextCore`] is the shared engine (construction,
//! registration, processing, association, commit). [`BasicBuildContext`]
//! and [`AggregatorBuildContext`] are thin specializations built on top of
//! it, composed rather than inherited — Rust has no open class hierarchy,
//! so the "subclass hooks" the design calls for are modeled as a
//! [`ContextPolicy`] implementation each specialization plugs in.

pub mod aggregator;
pub mod basic;
pub mod context;
pub mod handles;
pub mod test_support;
pub mod workspace_trait;

pub use aggregator::{AggregateCreator, AggregatorBuildContext};
pub use basic::BasicBuildContext;
pub use context::{BuildContextCore, ContextPolicy, StateRef};
pub use handles::{AggregateInput, AggregateOutput, Output, Resource, ResourceMetadata};
pub use workspace_trait::{MessageSink, WalkEntry, Workspace};
