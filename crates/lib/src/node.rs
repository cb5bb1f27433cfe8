//! The recursive value tree.
//!
//! A [`Node`] is a tagged union over exactly one of: an [`Undefined`]
//! placeholder, a terminal [`Leaf`], a `Map` of named children, or a `Seq` of
//! indexed children. Every node is exclusively owned by its parent container;
//! navigation is always root-to-leaf along a compiled path, so there are no
//! back-pointers and no shared ownership anywhere in the tree.
//!
//! Nodes are created lazily while walking a path on first write: a
//! placeholder takes its shape from the first segment written through it (an
//! integer segment establishes a sequence, anything else a map). Removal
//! prunes now-empty ancestors on the way back up.
//!
//! [`Undefined`]: Node::Undefined

use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::errors::MapError;
use crate::value::{Leaf, Scalar};

/// A node of the value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Placeholder created while walking a path, before the terminal shape
    /// of this position is known.
    #[default]
    Undefined,
    /// Terminal scalar plus export metadata.
    Leaf(Leaf),
    /// Named children. Key order is not defined; establishment order is
    /// tracked separately by [`OrderedMap`](crate::map::OrderedMap).
    Map(HashMap<String, Node>),
    /// Indexed children in sequence order.
    Seq(Vec<Node>),
}

impl Node {
    /// Creates a leaf node carrying `value` with no metadata.
    pub fn leaf(value: impl Into<Scalar>) -> Self {
        Node::Leaf(Leaf::new(value))
    }

    /// Creates an empty map node.
    pub fn map() -> Self {
        Node::Map(HashMap::new())
    }

    /// Creates a sequence node over `elems`.
    pub fn seq(elems: Vec<Node>) -> Self {
        Node::Seq(elems)
    }

    /// Renders the tree as a JSON string: `Undefined` as null, leaves as
    /// their bare scalars, containers as objects and arrays.
    pub fn to_json_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the shape name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Undefined => "undefined",
            Node::Leaf(_) => "leaf",
            Node::Map(_) => "map",
            Node::Seq(_) => "seq",
        }
    }

    /// Returns true if nothing lives here: a placeholder, a null-valued
    /// leaf, or a container with no children. Empty nodes are pruned by
    /// [`remove`](Node::remove) on the way back up.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Undefined => true,
            Node::Leaf(leaf) => leaf.is_empty(),
            Node::Map(children) => children.is_empty(),
            Node::Seq(elems) => elems.is_empty(),
        }
    }

    /// Attempts to view this node as a leaf.
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Attempts to view this node as a map.
    pub fn as_map(&self) -> Option<&HashMap<String, Node>> {
        match self {
            Node::Map(children) => Some(children),
            _ => None,
        }
    }

    /// Attempts to view this node as a sequence.
    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(elems) => Some(elems),
            _ => None,
        }
    }

    /// A placeholder is a position a write may still shape: an `Undefined`
    /// node or a leaf that never received a payload.
    fn is_placeholder(&self) -> bool {
        match self {
            Node::Undefined => true,
            Node::Leaf(leaf) => leaf.is_empty(),
            _ => false,
        }
    }

    /// Shapes a placeholder from the segment about to be consumed: an
    /// integer segment establishes a sequence, anything else a map.
    fn shape_from_segment(&mut self, seg: &str) {
        if self.is_placeholder() {
            *self = if seg.parse::<i64>().is_ok() {
                Node::Seq(Vec::new())
            } else {
                Node::Map(HashMap::new())
            };
        }
    }

    /// Resolves `path` to the node it addresses.
    ///
    /// A leaf only matches an exhausted path; descending further yields
    /// [`MapError::NotFound`]. Sequence indexes are base-10; negative
    /// indexes address from the end (`idx += len`) and anything outside
    /// `[0, len)` after normalization is `NotFound`. A non-numeric segment
    /// against a sequence surfaces the parse error verbatim.
    pub fn field(&self, path: &[String]) -> Result<&Node, MapError> {
        let Some((seg, rest)) = path.split_first() else {
            return match self {
                Node::Undefined => Err(MapError::NotFound),
                _ => Ok(self),
            };
        };
        match self {
            Node::Undefined | Node::Leaf(_) => Err(MapError::NotFound),
            Node::Map(children) => children
                .get(seg.as_str())
                .ok_or(MapError::NotFound)?
                .field(rest),
            Node::Seq(elems) => {
                let mut idx: i64 = seg.parse()?;
                if idx < 0 {
                    idx += elems.len() as i64;
                }
                if idx < 0 || idx as usize >= elems.len() {
                    return Err(MapError::NotFound);
                }
                elems[idx as usize].field(rest)
            }
        }
    }

    /// Writes `val` at `path`, creating intermediate nodes as needed.
    ///
    /// An exhausted path overwrites this node's tag and payload with `val`
    /// outright, whatever shape either side has. Otherwise the walk consumes
    /// one segment: maps create the named child on demand; sequences grow
    /// only at `index == len` (one element per call), normalize negative
    /// indexes by length addition and write the normalized segment back into
    /// the caller's path buffer, and reject anything else out of range with
    /// [`MapError::NotFound`]. A populated leaf with path remaining is
    /// [`MapError::WrongPath`].
    ///
    /// Returns whether any new node was created along the walk; the ordered
    /// facade uses this to decide between recording a fresh field and
    /// refreshing an existing one.
    pub fn set(&mut self, path: &mut [String], val: Node) -> Result<bool, MapError> {
        let Some((seg, rest)) = path.split_first_mut() else {
            *self = val;
            return Ok(false);
        };
        self.shape_from_segment(seg);
        match self {
            Node::Undefined | Node::Leaf(_) => Err(MapError::WrongPath),
            Node::Map(children) => {
                let mut added = false;
                let child = children.entry(seg.clone()).or_insert_with(|| {
                    added = true;
                    Node::Undefined
                });
                Ok(child.set(rest, val)? || added)
            }
            Node::Seq(elems) => {
                let idx = normalize_index(seg, elems.len())?;
                if idx == elems.len() {
                    elems.push(Node::Undefined);
                    elems[idx].set(rest, val)?;
                    Ok(true)
                } else if idx < elems.len() {
                    elems[idx].set(rest, val)
                } else {
                    Err(MapError::NotFound)
                }
            }
        }
    }

    /// Removes whatever `path` addresses, pruning now-empty ancestors on
    /// the way back up.
    ///
    /// An exhausted path clears this node back to `Undefined`. A missing map
    /// key with exactly one segment remaining is an idempotent no-op; with
    /// more segments remaining it is [`MapError::WrongPath`]. An index
    /// segment that fails to parse short-circuits before any pruning.
    pub fn remove(&mut self, path: &mut [String]) -> Result<(), MapError> {
        let Some((seg, rest)) = path.split_first_mut() else {
            *self = Node::Undefined;
            return Ok(());
        };
        match self {
            Node::Undefined | Node::Leaf(_) => Err(MapError::WrongPath),
            Node::Map(children) => {
                if rest.is_empty() {
                    children.remove(seg.as_str());
                    return Ok(());
                }
                let Some(child) = children.get_mut(seg.as_str()) else {
                    return Err(MapError::WrongPath);
                };
                child.remove(rest)?;
                if child.is_empty() {
                    children.remove(seg.as_str());
                }
                Ok(())
            }
            Node::Seq(elems) => {
                let idx = normalize_index(seg, elems.len())?;
                if idx >= elems.len() {
                    return Err(MapError::NotFound);
                }
                if rest.is_empty() {
                    elems.remove(idx);
                    return Ok(());
                }
                elems[idx].remove(rest)?;
                if elems[idx].is_empty() {
                    elems.remove(idx);
                }
                Ok(())
            }
        }
    }

    /// Appends one leaf to the sequence at `path`, returning the index of
    /// the new element.
    ///
    /// An `Undefined` or payload-less leaf target converts in place into a
    /// one-element sequence. A map or populated leaf target at an exhausted
    /// path is [`MapError::WrongPath`]; appending never merges.
    pub fn append(&mut self, path: &mut [String], leaf: Leaf) -> Result<usize, MapError> {
        let Some((seg, rest)) = path.split_first_mut() else {
            return match self {
                Node::Undefined => {
                    *self = Node::Seq(vec![Node::Leaf(leaf)]);
                    Ok(0)
                }
                Node::Leaf(prev) if prev.is_empty() => {
                    *self = Node::Seq(vec![Node::Leaf(leaf)]);
                    Ok(0)
                }
                Node::Seq(elems) => {
                    elems.push(Node::Leaf(leaf));
                    Ok(elems.len() - 1)
                }
                Node::Leaf(_) | Node::Map(_) => Err(MapError::WrongPath),
            };
        };
        self.shape_from_segment(seg);
        match self {
            Node::Undefined | Node::Leaf(_) => Err(MapError::WrongPath),
            Node::Map(children) => children
                .entry(seg.clone())
                .or_default()
                .append(rest, leaf),
            Node::Seq(elems) => {
                let idx = normalize_index(seg, elems.len())?;
                if idx == elems.len() {
                    elems.push(Node::Undefined);
                    elems[idx].append(rest, leaf)
                } else if idx < elems.len() {
                    elems[idx].append(rest, leaf)
                } else {
                    Err(MapError::NotFound)
                }
            }
        }
    }

    /// Concatenates `leaf`'s textual form onto the value at `path`.
    ///
    /// When the target sequence already has elements, the text lands on the
    /// last one instead of creating a new element; a populated leaf target
    /// concatenates onto itself. When nothing exists yet this behaves like
    /// [`append`](Node::append). A map target is [`MapError::WrongPath`]:
    /// no merge semantics exist for concatenation.
    ///
    /// Returns the index of the affected element and whether it was newly
    /// created.
    pub fn compose(&mut self, path: &mut [String], leaf: Leaf) -> Result<(usize, bool), MapError> {
        let Some((seg, rest)) = path.split_first_mut() else {
            return match self {
                Node::Undefined => {
                    *self = Node::Seq(vec![Node::Leaf(leaf)]);
                    Ok((0, true))
                }
                Node::Leaf(prev) if prev.is_empty() => {
                    *self = Node::Seq(vec![Node::Leaf(leaf)]);
                    Ok((0, true))
                }
                Node::Leaf(prev) => {
                    prev.value = Scalar::Text(format!("{}{}", prev.value, leaf.value));
                    Ok((0, false))
                }
                Node::Seq(elems) => match elems.last_mut() {
                    None => {
                        elems.push(Node::Leaf(leaf));
                        Ok((0, true))
                    }
                    Some(Node::Leaf(prev)) => {
                        prev.value = Scalar::Text(format!("{}{}", prev.value, leaf.value));
                        Ok((elems.len() - 1, false))
                    }
                    Some(_) => Err(MapError::WrongPath),
                },
                Node::Map(_) => Err(MapError::WrongPath),
            };
        };
        self.shape_from_segment(seg);
        match self {
            Node::Undefined | Node::Leaf(_) => Err(MapError::WrongPath),
            Node::Map(children) => children
                .entry(seg.clone())
                .or_default()
                .compose(rest, leaf),
            Node::Seq(elems) => {
                let idx = normalize_index(seg, elems.len())?;
                if idx == elems.len() {
                    elems.push(Node::Undefined);
                    elems[idx].compose(rest, leaf)
                } else if idx < elems.len() {
                    elems[idx].compose(rest, leaf)
                } else {
                    Err(MapError::NotFound)
                }
            }
        }
    }
}

/// Parses a sequence index, normalizing a negative value by length addition
/// and writing the positive form back into the caller's segment so later use
/// of the same buffer sees it. The parse error surfaces verbatim.
fn normalize_index(seg: &mut String, len: usize) -> Result<usize, MapError> {
    let mut idx: i64 = seg.parse()?;
    if idx < 0 {
        idx += len as i64;
        if idx < 0 {
            return Err(MapError::NotFound);
        }
        *seg = idx.to_string();
    }
    Ok(idx as usize)
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Leaf(Leaf::new(value))
    }
}

/// Structured rendering: `Undefined` serializes as null, a leaf as its bare
/// scalar (metadata never reaches the rendered form), containers as JSON
/// objects and arrays.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Undefined => serializer.serialize_unit(),
            Node::Leaf(leaf) => leaf.value.serialize(serializer),
            Node::Map(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            Node::Seq(elems) => {
                let mut seq = serializer.serialize_seq(Some(elems.len()))?;
                for elem in elems {
                    seq.serialize_element(elem)?;
                }
                seq.end()
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.to_json_string().map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
