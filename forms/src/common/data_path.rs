// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dot separated address of a value inside a nested JSON data model, eg:
/// `"address.city"`. Numeric segments index into arrays (`"phones.0.number"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPath(String);

impl DataPath {
    pub fn new(path: impl Into<String>) -> Self { DataPath(path.into()) }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|segment| !segment.is_empty())
    }

    /// Read the value at this path. Returns [None] if any segment is absent.
    #[must_use]
    pub fn get<'a>(&self, model: &'a Value) -> Option<&'a Value> {
        let mut current = model;
        for segment in self.segments() {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at this path. Numeric segments index into arrays, which are padded
    /// with `null` up to the index. Missing intermediate nodes are created as arrays when
    /// the segment that addresses them is numeric, and as objects otherwise. A scalar
    /// sitting where an intermediate node is needed gets replaced.
    pub fn set(&self, model: &mut Value, value: Value) {
        let segments: Vec<&str> = self.segments().collect();
        if write_at(model, &segments, value).is_none() {
            // % is Display, ? is Debug.
            tracing::warn!(message = "🗺️ could not write data path", path = %self);
        }
    }
}

fn write_at(node: &mut Value, segments: &[&str], value: Value) -> Option<()> {
    let Some((segment, rest)) = segments.split_first() else {
        *node = value;
        return Some(());
    };

    let slot = match segment.parse::<usize>() {
        Ok(index) if !node.is_object() => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let items = node.as_array_mut()?;
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(index)?
        }
        _ => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node.as_object_mut()?
                .entry((*segment).to_string())
                .or_insert(Value::Null)
        }
    };

    write_at(slot, rest, value)
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for DataPath {
    fn from(it: &str) -> Self { DataPath::new(it) }
}

impl From<String> for DataPath {
    fn from(it: String) -> Self { DataPath(it) }
}
