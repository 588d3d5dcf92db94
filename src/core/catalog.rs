//! Hierarchical translation catalog.
//!
//! A catalog is a tree addressed by dot-delimited paths: `home.title` is the
//! leaf `title` inside the branch `home`. The same type holds the baseline
//! loaded from disk, the merged extraction result, and the sparse catalogs of
//! a diff report.

use indexmap::{IndexMap, map::Entry};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A node of the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CatalogNode {
    Leaf(String),
    Branch(Catalog),
}

/// Ordered mapping from segment name to node. The root is always a branch.
///
/// Entries keep their first insertion order, so serializing a catalog built
/// from a fixed observation order always yields the same document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: IndexMap<String, CatalogNode>,
}

/// Why a strict insertion was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogConflict {
    /// A shorter prefix of the key already holds a leaf.
    ParentInUse { parent: String },
    /// The key itself already holds a branch; lists the existing sub-keys.
    HasSubKeys { sub_keys: Vec<String> },
}

/// Flattened `(dotted path, value)` view of a catalog, in tree order.
pub type FlatCatalog = IndexMap<String, String>;

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                CatalogNode::Leaf(_) => 1,
                CatalogNode::Branch(branch) => branch.leaf_count(),
            })
            .sum()
    }

    /// Resolve a dotted path to a node.
    pub fn get(&self, key: &str) -> Option<&CatalogNode> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;
        for segment in segments {
            match node {
                CatalogNode::Branch(branch) => node = branch.entries.get(segment)?,
                CatalogNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Resolve a dotted path to a leaf value.
    pub fn get_leaf(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            CatalogNode::Leaf(value) => Some(value),
            CatalogNode::Branch(_) => None,
        }
    }

    /// Assign a leaf, refusing to turn a leaf into a parent or a parent into a leaf.
    ///
    /// Returns the previous leaf value at this exact path, if any. On conflict
    /// the catalog is left untouched: conflicts can only be met while walking
    /// nodes that already exist, before anything has been created.
    pub fn insert(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, CatalogConflict> {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };

        let mut node = self;
        for (depth, segment) in parents.iter().enumerate() {
            let child = node
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| CatalogNode::Branch(Catalog::new()));
            node = match child {
                CatalogNode::Branch(branch) => branch,
                CatalogNode::Leaf(_) => {
                    return Err(CatalogConflict::ParentInUse {
                        parent: segments[..=depth].join("."),
                    });
                }
            };
        }

        match node.entries.entry((*last).to_string()) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                CatalogNode::Branch(branch) => Err(CatalogConflict::HasSubKeys {
                    sub_keys: branch
                        .entries
                        .keys()
                        .map(|sub| format!("{}.{}", key, sub))
                        .collect(),
                }),
                CatalogNode::Leaf(existing) => {
                    Ok(Some(std::mem::replace(existing, value.into())))
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(CatalogNode::Leaf(value.into()));
                Ok(None)
            }
        }
    }

    /// Assign a leaf unconditionally, replacing whatever is in the way.
    ///
    /// Used to rebuild sparse catalogs from already-consistent flat paths.
    pub fn set_path(&mut self, key: &str, value: impl Into<String>) {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut node = self;
        for segment in parents {
            let child = node
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| CatalogNode::Branch(Catalog::new()));
            if matches!(child, CatalogNode::Leaf(_)) {
                *child = CatalogNode::Branch(Catalog::new());
            }
            let CatalogNode::Branch(branch) = child else {
                return;
            };
            node = branch;
        }

        node.entries
            .insert((*last).to_string(), CatalogNode::Leaf(value.into()));
    }

    /// Flatten to `(dotted path, value)` pairs.
    pub fn flatten(&self) -> FlatCatalog {
        let mut result = FlatCatalog::new();
        self.flatten_into(String::new(), &mut result);
        result
    }

    fn flatten_into(&self, prefix: String, result: &mut FlatCatalog) {
        for (key, node) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match node {
                CatalogNode::Leaf(value) => {
                    result.insert(path, value.clone());
                }
                CatalogNode::Branch(branch) => branch.flatten_into(path, result),
            }
        }
    }

    /// Build a catalog from parsed JSON.
    ///
    /// Strings become leaves, objects become branches, arrays become branches
    /// keyed by index. Numbers, booleans and nulls carry no translatable text
    /// and are skipped. A non-object root yields an empty catalog.
    pub fn from_json(value: &Value) -> Self {
        let mut catalog = Catalog::new();
        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    if let Some(node) = node_from_json(val) {
                        catalog.entries.insert(key.clone(), node);
                    }
                }
            }
            Value::Array(items) => {
                for (index, val) in items.iter().enumerate() {
                    if let Some(node) = node_from_json(val) {
                        catalog.entries.insert(index.to_string(), node);
                    }
                }
            }
            _ => {}
        }
        catalog
    }

    /// Compact JSON rendering.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn node_from_json(value: &Value) -> Option<CatalogNode> {
    match value {
        Value::String(s) => Some(CatalogNode::Leaf(s.clone())),
        Value::Object(_) | Value::Array(_) => Some(CatalogNode::Branch(Catalog::from_json(value))),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Catalog::from_json(&value))
    }
}
