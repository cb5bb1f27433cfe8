//! Leaf values for the navigable tree.
//!
//! This module provides the [`Scalar`] enum carrying the dynamically-typed
//! payload of a terminal node, and the [`Leaf`] wrapper that pairs it with
//! the export metadata attached by the upstream field-extraction engine: the
//! originating path, the new-branch flag marking the start of a fresh
//! repetition group, and the attribute marker used by structured-markup
//! export to tell attribute-like values apart from body values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically-typed scalar stored in a terminal tree node.
///
/// `Scalar` implements `PartialEq` against primitives for ergonomic
/// comparisons:
///
/// ```
/// # use navmap::value::Scalar;
/// let text = Scalar::Text("hello".to_string());
/// let number = Scalar::Int(42);
///
/// assert!(text == "hello");
/// assert!(number == 42);
/// assert!(!(text == 42));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Absent/empty value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(String),
}

impl Scalar {
    /// Returns true if this is the null scalar
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The bare textual form, used when concatenating repeated field values and
/// by string-typed reads. Null renders as the empty string.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        match self {
            Scalar::Text(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Scalar {
    fn eq(&self, other: &String) -> bool {
        match self {
            Scalar::Text(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        match self {
            Scalar::Int(n) => n == other,
            _ => false,
        }
    }
}

impl PartialEq<i32> for Scalar {
    fn eq(&self, other: &i32) -> bool {
        match self {
            Scalar::Int(n) => *n == *other as i64,
            _ => false,
        }
    }
}

impl PartialEq<bool> for Scalar {
    fn eq(&self, other: &bool) -> bool {
        match self {
            Scalar::Bool(b) => b == other,
            _ => false,
        }
    }
}

// Reverse implementations for symmetry
impl PartialEq<Scalar> for str {
    fn eq(&self, other: &Scalar) -> bool {
        other == self
    }
}

impl PartialEq<Scalar> for &str {
    fn eq(&self, other: &Scalar) -> bool {
        other == *self
    }
}

impl PartialEq<Scalar> for i64 {
    fn eq(&self, other: &Scalar) -> bool {
        other == self
    }
}

/// A terminal scalar plus its export metadata.
///
/// Leaves are produced by the upstream field-extraction engine; the tree
/// stores them as-is and never interprets the metadata itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leaf {
    /// The scalar payload.
    pub value: Scalar,
    /// The template path this value originated from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Marks the start of a fresh repetition group when several leaves share
    /// a path pattern.
    #[serde(default)]
    pub new_branch: bool,
    /// Identifies attribute-like values for structured-markup export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
}

impl Leaf {
    /// Creates a leaf carrying `value` with no metadata.
    pub fn new(value: impl Into<Scalar>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Builder method to record the originating path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder method to mark the start of a fresh repetition group.
    pub fn with_new_branch(mut self, new_branch: bool) -> Self {
        self.new_branch = new_branch;
        self
    }

    /// Builder method to mark this as an attribute-like value.
    pub fn with_attribute_id(mut self, id: impl Into<String>) -> Self {
        self.attribute_id = Some(id.into());
        self
    }

    /// Returns true if the leaf carries no payload.
    pub fn is_empty(&self) -> bool {
        self.value.is_null()
    }
}

/// Renders exactly as the scalar payload; metadata never reaches the
/// textual surface.
impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
