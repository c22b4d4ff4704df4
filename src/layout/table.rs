// Thu Aug 06 2026 - Alex

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value recorded for a layout path. A member path stores its byte offset
/// from the start of its root structure; a root/prototype path stores the
/// structure's total size. The variant is fixed by the path's own shape
/// when the entry is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutValue {
    Offset(u32),
    StructSize(u32),
}

impl LayoutValue {
    pub fn raw(&self) -> u32 {
        match self {
            LayoutValue::Offset(value) | LayoutValue::StructSize(value) => *value,
        }
    }
}

impl fmt::Display for LayoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutValue::Offset(value) => write!(f, "offset {}", value),
            LayoutValue::StructSize(value) => write!(f, "size {}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub path: String,
    pub value: LayoutValue,
}

/// Insertion-ordered table mapping each structure and variable path to its
/// layout value. At most one entry exists per distinct path.
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    entries: IndexMap<String, LayoutValue>,
}

// A path denotes a member iff it contains a comma; a bare structure name is
// a root/prototype entry
fn tag(path: &str, value: u32) -> LayoutValue {
    if path.contains(',') {
        LayoutValue::Offset(value)
    } else {
        LayoutValue::StructSize(value)
    }
}

impl LayoutTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append an entry, tagging the value by the path's shape
    pub fn push(&mut self, path: &str, value: u32) {
        self.entries.insert(path.to_string(), tag(path, value));
    }

    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.entries.get_index_of(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Remove the entry at the given index, preserving the order of the
    /// remaining entries
    pub fn remove_index(&mut self, index: usize) {
        self.entries.shift_remove_index(index);
    }

    pub fn set_value_at(&mut self, index: usize, value: u32) {
        if let Some((path, slot)) = self.entries.get_index_mut(index) {
            *slot = tag(path, value);
        }
    }

    pub fn get(&self, path: &str) -> Option<LayoutValue> {
        self.entries.get(path).copied()
    }

    /// Byte offset of the given variable path relative to its root
    /// structure. A trailing bit length is ignored. A root/prototype path
    /// reports offset 0 (its slot holds the structure size). Returns `None`
    /// if the path is unknown.
    pub fn offset_of(&self, path: &str) -> Option<u32> {
        let (key, _) = crate::layout::path::split_bit_length(path);

        let value = self.get(key)?;

        if key.contains(',') {
            Some(value.raw())
        } else {
            Some(0)
        }
    }

    /// Total size in bytes of the named structure; 0 if unknown
    pub fn struct_size(&self, name: &str) -> u32 {
        match self.get(name) {
            Some(LayoutValue::StructSize(size)) => size,
            _ => 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LayoutValue)> {
        self.entries.iter().map(|(path, value)| (path.as_str(), *value))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|path| path.as_str())
    }

    pub fn entries(&self) -> Vec<LayoutEntry> {
        self.entries
            .iter()
            .map(|(path, value)| LayoutEntry {
                path: path.clone(),
                value: *value,
            })
            .collect()
    }
}
