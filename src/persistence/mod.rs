//! # Persistence Module
//!
//! Key-value storage behind the overlay's settings and widget positions.
//!
//! ## Key Abstractions
//! - **[`LayoutStore`]**: typed get/put plus an explicit `commit`. Writes are
//!   buffered until committed, so a caller decides when a change becomes durable.
//! - **[`MemoryStore`]**: volatile store for tests and hosts that persist elsewhere.
//! - **[`layout_file::TomlLayoutStore`]**: TOML file on disk.
//!
//! ## Error Handling Strategy
//! Reads never fail: a missing or mistyped key is `None` and the caller picks a
//! default. Only `commit` can fail, with a [`StoreError`].

pub mod layout_file;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl StoreValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            StoreValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    // Integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f32> {
        match self {
            StoreValue::Float(value) => Some(*value as f32),
            StoreValue::Int(value) => Some(*value as f32),
            StoreValue::Bool(_) => None,
        }
    }
}

/// Settings and layout storage.
pub trait LayoutStore: Send {
    fn get(&self, key: &str) -> Option<StoreValue>;

    fn put(&mut self, key: &str, value: StoreValue);

    /// Makes every write so far durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_int())
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.as_float())
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, StoreValue::Bool(value));
    }

    fn put_int(&mut self, key: &str, value: i64) {
        self.put(key, StoreValue::Int(value));
    }

    fn put_float(&mut self, key: &str, value: f32) {
        self.put(key, StoreValue::Float(value as f64));
    }
}

/// In-memory store. `commit` only counts calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, StoreValue>,
    commits: usize,
}

impl MemoryStore {
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl LayoutStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.values.get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoreValue) {
        self.values.insert(key.to_string(), value);
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        Ok(())
    }
}
