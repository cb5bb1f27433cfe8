//! Ordered navigable map.
//!
//! [`OrderedMap`] glues the three layers together for export pipelines that
//! must emit fields in the order templates established them: a [`Node`] tree
//! holding the values, an [`OrderedList`] ledger recording one entry per
//! established field, and a backreference index from field keys to their
//! ledger handles so a re-set can refresh its entry in place.
//!
//! Field keys group ledger entries: a write's key is its normalized path
//! with a trailing numeric segment stripped, so `Field[0]` and `Field[1]`
//! share the key `Field` while remaining distinct ledger entries. Bulk
//! appends key each element by its exact indexed path instead.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::errors::MapError;
use crate::node::Node;
use crate::order::{Handle, OrderedList};
use crate::path::{self, FullPath};
use crate::value::{Leaf, Scalar};

/// Value tree with an insertion-order ledger over its fields.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    tree: Node,
    order: OrderedList<Vec<String>>,
    refs: HashMap<Vec<String>, Vec<Handle>>,
}

impl OrderedMap {
    /// Creates an empty map with an empty ledger.
    pub fn new() -> Self {
        OrderedMap {
            tree: Node::map(),
            order: OrderedList::new(),
            refs: HashMap::new(),
        }
    }

    /// Returns true if no field holds a value.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Read-only view of the underlying tree.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Renders the live tree as a JSON string.
    pub fn to_json_string(&self) -> crate::Result<String> {
        self.tree.to_json_string()
    }

    /// Number of ledger entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Writes `val` at `path`, recording establishment order.
    ///
    /// The first write under a field key appends a fresh ledger entry;
    /// overwriting an already established field refreshes its most recent
    /// entry instead (payload updated to the normalized path, entry moved
    /// to the back). An empty path is [`MapError::WrongPath`]; tree errors
    /// propagate before the ledger is touched.
    pub fn set(&mut self, path: &FullPath, val: Node) -> Result<(), MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        let mut slice = path.slice.clone();
        let added = self.tree.set(&mut slice, val)?;
        trace!(path = %path.path, added, "set field");
        let key = path::stripped(&slice).to_vec();
        if !added
            && let Some(handle) = self.latest_ref(&key)
        {
            if let Some(payload) = self.order.get_mut(handle) {
                *payload = slice;
            }
            self.order.move_to_back(handle);
            return Ok(());
        }
        self.record(key, slice);
        Ok(())
    }

    /// Replaces the sequence at `path` with `elems`, re-establishing its
    /// order entries: every entry grouped under the path is dropped and one
    /// fresh entry per element, keyed by its exact indexed path, lands at
    /// the back of the ledger.
    pub fn set_as_slice(&mut self, path: &FullPath, elems: Vec<Node>) -> Result<(), MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        let mut slice = path.slice.clone();
        let count = elems.len();
        self.tree.set(&mut slice, Node::Seq(elems))?;
        trace!(path = %path.path, count, "set slice field");
        self.prune(&slice);
        for idx in 0..count {
            let mut entry = slice.clone();
            entry.push(idx.to_string());
            self.record(entry.clone(), entry);
        }
        Ok(())
    }

    /// Appends one leaf to the sequence at `path` and records a ledger
    /// entry for the new element, keyed by the given path.
    pub fn append(&mut self, path: &FullPath, leaf: Leaf) -> Result<usize, MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        let mut slice = path.slice.clone();
        let idx = self.tree.append(&mut slice, leaf)?;
        let mut entry = slice.clone();
        entry.push(idx.to_string());
        self.record(slice, entry);
        Ok(idx)
    }

    /// Concatenates `leaf` onto the last element at `path`. When this
    /// creates the element the ledger gains a fresh entry; otherwise the
    /// field's most recent entry is refreshed and moved to the back.
    pub fn compose(&mut self, path: &FullPath, leaf: Leaf) -> Result<(), MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        let mut slice = path.slice.clone();
        let (idx, created) = self.tree.compose(&mut slice, leaf)?;
        let mut entry = slice.clone();
        entry.push(idx.to_string());
        if !created
            && let Some(handle) = self.latest_ref(&slice)
        {
            if let Some(payload) = self.order.get_mut(handle) {
                *payload = entry;
            }
            self.order.move_to_back(handle);
            return Ok(());
        }
        self.record(slice, entry);
        Ok(())
    }

    /// Removes whatever `path` addresses and every ledger entry grouped
    /// under it. An empty path is [`MapError::WrongPath`]; a missing
    /// top-level field is an idempotent no-op. Tree errors propagate before
    /// any ledger entry is dropped.
    pub fn remove(&mut self, path: &FullPath) -> Result<(), MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        let mut slice = path.slice.clone();
        self.tree.remove(&mut slice)?;
        trace!(path = %path.path, "removed field");
        self.prune(&slice);
        Ok(())
    }

    /// Resets to the freshly constructed state: empty tree, empty ledger
    /// with a new identity, cleared backreferences.
    pub fn remove_all(&mut self) {
        debug!(entries = self.order.len(), "clearing map");
        self.tree = Node::map();
        self.order.clear();
        self.refs.clear();
    }

    /// Resolves `path` to its leaf. The path must already be compiled;
    /// an empty path is [`MapError::WrongPath`] and a container target is
    /// [`MapError::NotFound`].
    pub fn field(&self, path: &[String]) -> Result<&Leaf, MapError> {
        if path.is_empty() {
            return Err(MapError::WrongPath);
        }
        self.tree.field(path)?.as_leaf().ok_or(MapError::NotFound)
    }

    /// Resolves `path` to any node, compiling bracket notation inside each
    /// segment first, so `["Field5[0]"]` and `["Field5", "0"]` address the
    /// same element.
    pub fn field_as_value<S: AsRef<str>>(&self, path: &[S]) -> Result<&Node, MapError> {
        let compiled = path::compile_slice(path);
        if compiled.is_empty() {
            return Err(MapError::WrongPath);
        }
        self.tree.field(&compiled)
    }

    /// [`field_as_value`](OrderedMap::field_as_value) rendered to text: a
    /// leaf yields its bare scalar form, containers their JSON form.
    pub fn field_as_str<S: AsRef<str>>(&self, path: &[S]) -> Result<String, MapError> {
        let node = self.field_as_value(path)?;
        Ok(match node.as_leaf() {
            Some(leaf) => leaf.value.to_string(),
            None => node.to_string(),
        })
    }

    /// The recorded establishment order, front to back.
    pub fn ordered_paths(&self) -> Vec<Vec<String>> {
        self.order.iter().cloned().collect()
    }

    /// Leaf values in establishment order. Each recorded path is resolved
    /// against the live tree; entries that no longer reach a leaf are
    /// skipped.
    pub fn ordered_fields(&self) -> Vec<Scalar> {
        self.order
            .iter()
            .filter_map(|p| Some(self.tree.field(p).ok()?.as_leaf()?.value.clone()))
            .collect()
    }

    /// [`ordered_fields`](OrderedMap::ordered_fields) rendered to strings.
    pub fn ordered_fields_as_strings(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|p| Some(self.tree.field(p).ok()?.as_leaf()?.value.to_string()))
            .collect()
    }

    /// Most recent still-linked ledger handle for `key`, dropping any stale
    /// backreferences found on the way.
    fn latest_ref(&mut self, key: &[String]) -> Option<Handle> {
        let handles = self.refs.get_mut(key)?;
        while let Some(&handle) = handles.last() {
            if self.order.contains(handle) {
                return Some(handle);
            }
            handles.pop();
        }
        None
    }

    /// Appends a ledger entry with payload `entry`, grouped under `key`.
    fn record(&mut self, key: Vec<String>, entry: Vec<String>) {
        let handle = self.order.push_back(entry);
        self.refs.entry(key).or_default().push(handle);
    }

    /// Drops every ledger entry whose field key starts with `prefix`,
    /// segment for segment.
    fn prune(&mut self, prefix: &[String]) {
        let OrderedMap { order, refs, .. } = self;
        refs.retain(|key, handles| {
            if key.starts_with(prefix) {
                for handle in handles.drain(..) {
                    order.remove(handle);
                }
                false
            } else {
                true
            }
        });
    }
}

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tree.serialize(serializer)
    }
}

impl fmt::Display for OrderedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt(f)
    }
}
