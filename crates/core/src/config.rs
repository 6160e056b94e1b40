// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration fingerprint: the build's identity, supplied by the host.
//!
//! Any mutation — insert, delete, or value change — between two builds
//! forces escalation on the next one.

use crate::attribute::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single changed configuration key, recorded for diagnostic logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigKeyDiff {
    pub key: String,
    pub previous: Option<AttributeValue>,
    pub current: Option<AttributeValue>,
}

/// The build's configuration fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration(BTreeMap<String, AttributeValue>);

impl Configuration {
    pub fn new(entries: BTreeMap<String, AttributeValue>) -> Self {
        Configuration(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// True iff `self` is empty or any key differs in value or membership
    /// between `self` (previous) and `current`.
    pub fn changed_from(&self, current: &Configuration) -> bool {
        if self.is_empty() {
            return true;
        }
        !self.diff(current).is_empty()
    }

    /// Every key whose value or presence differs between `self` (previous)
    /// and `current`, for diagnostic logging.
    pub fn diff(&self, current: &Configuration) -> Vec<ConfigKeyDiff> {
        let mut keys: Vec<&String> = self.0.keys().chain(current.0.keys()).collect();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .filter_map(|key| {
                let previous = self.0.get(key);
                let now = current.0.get(key);
                if previous == now {
                    None
                } else {
                    Some(ConfigKeyDiff {
                        key: key.clone(),
                        previous: previous.cloned(),
                        current: now.cloned(),
                    })
                }
            })
            .collect()
    }
}

impl FromIterator<(String, AttributeValue)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Configuration(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
