// SPDX-License-Identifier: MIT

//! Inventories: complete mappings from file name to metadata on one side
//! at one instant.

use crate::metadata::{CloudItem, LocalItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Unique key within one side's inventory.
///
/// A thin wrapper instead of a bare `String` so that inventory keys can't
/// be confused with arbitrary path or content-type strings at call sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileName(String);

impl FileName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FileName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A complete mapping from file name to metadata on one side, at one
/// instant. Iteration order is a `BTreeMap`'s lexicographic key order
/// (irrelevant per the spec, but deterministic — it makes property tests
/// and diffs reproducible).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory<T> {
    items: BTreeMap<FileName, T>,
}

impl<T> Inventory<T> {
    pub fn new() -> Self {
        Self { items: BTreeMap::new() }
    }

    pub fn from_items(items: impl IntoIterator<Item = (FileName, T)>) -> Self {
        Self { items: items.into_iter().collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, name: &FileName) -> Option<&T> {
        self.items.get(name)
    }

    pub fn contains_key(&self, name: &FileName) -> bool {
        self.items.contains_key(name)
    }

    pub fn insert(&mut self, name: FileName, item: T) -> Option<T> {
        self.items.insert(name, item)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FileName, T> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileName> {
        self.items.keys()
    }

    /// Keys present in `self` but not in `other`.
    pub fn keys_missing_from<'a, U>(
        &'a self,
        other: &'a Inventory<U>,
    ) -> impl Iterator<Item = &'a FileName> {
        self.items.keys().filter(move |k| !other.contains_key(k))
    }

    /// Keys present in both `self` and `other`.
    pub fn keys_shared_with<'a, U>(
        &'a self,
        other: &'a Inventory<U>,
    ) -> impl Iterator<Item = &'a FileName> {
        self.items.keys().filter(move |k| other.contains_key(k))
    }

    /// Entries present in `self` but not in `other`, yielding the item
    /// directly rather than a key that must be looked up again.
    pub fn items_missing_from<'a, U>(
        &'a self,
        other: &'a Inventory<U>,
    ) -> impl Iterator<Item = (&'a FileName, &'a T)> {
        self.items.iter().filter(move |(k, _)| !other.contains_key(k))
    }

    /// Entries present in both `self` and `other`, yielding both items
    /// directly. Keys only in `self` or only in `other` are skipped.
    pub fn pairs_shared_with<'a, U>(
        &'a self,
        other: &'a Inventory<U>,
    ) -> impl Iterator<Item = (&'a FileName, &'a T, &'a U)> {
        self.items.iter().filter_map(move |(k, v)| other.get(k).map(|u| (k, v, u)))
    }
}

impl<T> IntoIterator for Inventory<T> {
    type Item = (FileName, T);
    type IntoIter = btree_map::IntoIter<FileName, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

pub type LocalInventory = Inventory<LocalItem>;
pub type CloudInventory = Inventory<CloudItem>;
