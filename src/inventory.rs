//! Resource inventory reader.
//!
//! The inventory snapshot is a nested JSON document describing which
//! concrete resources exist, grouped by service category. Collectors
//! navigate it with dotted paths (`model-inference.storage.s3.resources`);
//! numeric segments index into sequences. Traversal is read-only.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Inventory {
    root: Value,
}

impl Inventory {
    /// Parse a snapshot file. Missing or malformed files are
    /// `DataUnavailable`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;
        let root: Value = serde_json::from_str(&content)
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;
        Ok(Self { root })
    }

    /// An inventory with no entries; every path fails with
    /// `PathNotFound`.
    pub fn empty() -> Self {
        Self { root: Value::Null }
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Navigate a dotted path and return the value it points at.
    pub fn resources_at(&self, path: &str) -> Result<&Value> {
        let mut current = &self.root;

        for segment in path.split('.') {
            current = match current {
                Value::Array(items) => {
                    let index: usize = segment
                        .parse()
                        .map_err(|_| Error::PathNotFound(path.to_string()))?;
                    items.get(index).ok_or_else(|| Error::PathNotFound(path.to_string()))?
                }
                Value::Object(map) => map
                    .get(segment)
                    .ok_or_else(|| Error::PathNotFound(path.to_string()))?,
                _ => return Err(Error::PathNotFound(path.to_string())),
            };
        }

        Ok(current)
    }

    /// The common shape: a list of resource ids or ARNs at a path.
    /// Non-string entries fail the whole lookup rather than being
    /// silently dropped.
    pub fn string_list_at(&self, path: &str) -> Result<Vec<String>> {
        let value = self.resources_at(path)?;
        let items = value
            .as_array()
            .ok_or_else(|| Error::PathNotFound(path.to_string()))?;

        items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| Error::PathNotFound(path.to_string()))
            })
            .collect()
    }
}
