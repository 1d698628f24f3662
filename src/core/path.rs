//! Oriented contig paths and the per-root path store.
//!
//! A `ContigPath` is a non-empty ordered sequence of oriented contig
//! references, anchored at a root contig. The `PathStore` files each path
//! under its root key and owns the path value exclusively: two keys may
//! hold equal paths, never the same allocation, so removing a subsumed
//! entry releases its path exactly once.

use std::collections::BTreeMap;
use std::ops::Index;

use crate::core::registry::{ContigRegistry, RegistryError};

/// Dense numeric key for a contig, assigned by the registry in first-seen
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContigKey(pub u32);

impl std::fmt::Display for ContigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One oriented contig reference inside a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathNode {
    pub id: ContigKey,
    /// Read reverse-complemented in context.
    pub reverse: bool,
}

impl PathNode {
    #[must_use]
    pub fn new(id: ContigKey, reverse: bool) -> Self {
        Self { id, reverse }
    }

    /// Orientation sign as it appears in path records: `+` forward,
    /// `-` reverse-complement.
    #[must_use]
    pub fn sign(&self) -> char {
        if self.reverse {
            '-'
        } else {
            '+'
        }
    }
}

/// An ordered, non-empty sequence of oriented contigs.
///
/// Paths order lexicographically over their nodes, which gives emission a
/// stable, pointer-free ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContigPath(Vec<PathNode>);

impl ContigPath {
    /// A fresh single-node path anchoring `root` in forward orientation.
    #[must_use]
    pub fn root(root: ContigKey) -> Self {
        Self(vec![PathNode::new(root, false)])
    }

    #[must_use]
    pub fn from_nodes(nodes: Vec<PathNode>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self(nodes)
    }

    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> PathNode {
        self.0[0]
    }

    /// Reverse-complement in place: node order reverses and every
    /// orientation flag toggles.
    pub fn reverse_complement(&mut self) {
        self.0.reverse();
        for node in &mut self.0 {
            node.reverse = !node.reverse;
        }
    }

    /// Indices at which `id` occurs, in ascending order, ignoring
    /// orientation.
    #[must_use]
    pub fn positions_of(&self, id: ContigKey) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, node)| node.id == id)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Insert `nodes` before the current first element, preserving their
    /// order.
    pub fn prepend(&mut self, nodes: &[PathNode]) {
        self.0.splice(0..0, nodes.iter().copied());
    }

    /// Append `nodes` after the current last element.
    pub fn append(&mut self, nodes: &[PathNode]) {
        self.0.extend_from_slice(nodes);
    }

    /// Render the path as `name<sign>` tokens joined by `sep`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownKey` if a node references an
    /// unallocated key.
    pub fn to_text(&self, registry: &ContigRegistry, sep: char) -> Result<String, RegistryError> {
        let mut out = String::new();
        for (idx, node) in self.0.iter().enumerate() {
            if idx > 0 {
                out.push(sep);
            }
            out.push_str(registry.name(node.id)?);
            out.push(node.sign());
        }
        Ok(out)
    }
}

impl Index<usize> for ContigPath {
    type Output = PathNode;

    fn index(&self, index: usize) -> &PathNode {
        &self.0[index]
    }
}

/// Mapping from root contig key to its current canonical path.
///
/// Iteration is sorted by key so every pass over the store is
/// deterministic.
#[derive(Debug, Default)]
pub struct PathStore(BTreeMap<ContigKey, ContigPath>);

impl PathStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ContigKey, path: ContigPath) {
        self.0.insert(key, path);
    }

    /// The stored path for `key`, creating a fresh root-only path if the
    /// key is absent.
    pub fn entry_or_root(&mut self, key: ContigKey) -> &mut ContigPath {
        self.0.entry(key).or_insert_with(|| ContigPath::root(key))
    }

    #[must_use]
    pub fn get(&self, key: ContigKey) -> Option<&ContigPath> {
        self.0.get(&key)
    }

    pub fn remove(&mut self, key: ContigKey) -> Option<ContigPath> {
        self.0.remove(&key)
    }

    #[must_use]
    pub fn contains_key(&self, key: ContigKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<ContigKey> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContigKey, &ContigPath)> {
        self.0.iter().map(|(k, p)| (*k, p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
