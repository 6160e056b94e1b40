// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed value grammar used for resource attributes, configuration
//! values, and anywhere else the source treats a value as an opaque
//! serializable blob.
//!
//! A reflective "serializable opaque value" doesn't have a natural Rust
//! reading, so attribute and configuration values are restricted to a
//! fixed, closed set of shapes instead. Anything outside this grammar is
//! rejected at set-time by the caller's type system, not at serialization
//! time.

use crate::error::CoreError;
use std::collections::BTreeMap;

/// A value that can be stored as a resource attribute or a configuration
/// entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Bytes(_) => "bytes",
            AttributeValue::List(_) => "list",
            AttributeValue::Map(_) => "map",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        AttributeValue::Bytes(v)
    }
}

/// Type-checked extraction, the Rust-native reading of
/// `getResourceAttribute(state, id, key, type)`'s `type` parameter.
macro_rules! try_from_variant {
    ($ty:ty, $variant:ident) => {
        impl TryFrom<&AttributeValue> for $ty {
            type Error = CoreError;

            fn try_from(value: &AttributeValue) -> Result<Self, Self::Error> {
                match value {
                    AttributeValue::$variant(v) => Ok(v.clone()),
                    other => Err(CoreError::invalid_argument(format!(
                        "expected {} attribute, got {}",
                        stringify!($variant),
                        other.kind()
                    ))),
                }
            }
        }
    };
}

try_from_variant!(String, String);
try_from_variant!(i64, Integer);
try_from_variant!(bool, Boolean);
try_from_variant!(Vec<u8>, Bytes);

#[cfg(test)]
#[path = "attribute_tests.rs"]
mod tests;
