//!
//! Navmap: an ordered, path-addressable nested value tree for assembling and
//! exporting records whose field order matters.
//!
//! ## Core Concepts
//!
//! The library is built around four layers:
//!
//! * **Paths (`path`)**: Template addresses like `Field2[1].Account[0]` are
//!   compiled once into flat segment slices; `[a;b]` brackets expand into
//!   sibling segments. A [`FullPath`](path::FullPath) carries both forms.
//! * **Value tree (`node`)**: A [`Node`](node::Node) is a tagged union over a
//!   placeholder, a terminal [`Leaf`](value::Leaf), a map of named children,
//!   or a sequence. Writes create intermediate nodes lazily and removal
//!   prunes emptied ancestors.
//! * **Order ledger (`order`)**: [`OrderedList`](order::OrderedList), a
//!   doubly linked ring over a slot arena with O(1) push, unlink, and
//!   reposition, addressed through list-checked [`Handle`](order::Handle)s.
//! * **Ordered map (`map`)**: [`OrderedMap`](map::OrderedMap) combines tree
//!   and ledger so exporters can replay fields in the order templates
//!   established them, regardless of where each field lives in the tree.

pub mod errors;
pub mod map;
pub mod node;
pub mod order;
pub mod path;
pub mod value;

/// Re-export the main entry points for easier access.
pub use map::OrderedMap;
pub use node::Node;
pub use value::{Leaf, Scalar};

/// Result type used throughout the navmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the navmap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured navigation errors from the map and node modules
    #[error(transparent)]
    Map(errors::MapError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Map(_) => "map",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a path that does not resolve.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a path shape mismatch.
    pub fn is_wrong_path(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_wrong_path(),
            _ => false,
        }
    }
}
