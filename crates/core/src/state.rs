// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted state record. Both the current and the previous build
//! share this shape; only the current one is ever mutated.

use crate::attribute::AttributeValue;
use crate::config::Configuration;
use crate::message::Message;
use crate::resource::{ResourceHolder, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Snapshot of everything the engine needs to carry between builds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildState {
    /// The build's identity fingerprint.
    pub configuration: Configuration,
    /// resource-id → holder, the change-detection record.
    pub resources: HashMap<ResourceId, ResourceHolder>,
    /// The subset of `resources` declared as outputs.
    pub outputs: HashSet<ResourceId>,
    /// resource-id → (key → value).
    pub resource_attributes: HashMap<ResourceId, HashMap<String, AttributeValue>>,
    /// resource-id → ordered diagnostics.
    pub resource_messages: HashMap<ResourceId, Vec<Message>>,
    /// input resource-id → set of output resource-ids it produced.
    pub resource_outputs: HashMap<ResourceId, HashSet<ResourceId>>,
}

impl BuildState {
    pub fn empty(configuration: Configuration) -> Self {
        BuildState { configuration, ..Default::default() }
    }

    /// All invariants from the data model in one place, for tests and for
    /// defensive assertions during development.
    ///
    /// Not called on every mutation (that would defeat the purpose of a
    /// mutable builder); used by scenario tests to assert the state handed
    /// to `commit` is well-formed.
    pub fn check_invariants(&self) -> Result<(), String> {
        for id in &self.outputs {
            if !self.resources.contains_key(id) {
                return Err(format!("output {id} is not a known resource"));
            }
        }
        for id in self.resource_attributes.keys() {
            if !self.resources.contains_key(id) {
                return Err(format!("attributes recorded for unknown resource {id}"));
            }
        }
        for id in self.resource_messages.keys() {
            if !self.resources.contains_key(id) {
                return Err(format!("messages recorded for unknown resource {id}"));
            }
        }
        for id in self.resource_outputs.keys() {
            if !self.resources.contains_key(id) {
                return Err(format!("output association recorded for unknown input {id}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
