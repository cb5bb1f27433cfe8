//! Error types for tree and map operations.
//!
//! The taxonomy is deliberately small: an address can be syntactically valid
//! but point at nothing ([`MapError::NotFound`]), it can be structurally
//! incompatible with the shape of the tree it walks
//! ([`MapError::WrongPath`]), or an index segment can fail to parse as an
//! integer ([`MapError::Index`]). All three are ordinary return values;
//! callers decide policy (a miss during removal is usually a no-op, a miss
//! during a read is a genuine error).

use thiserror::Error;

/// Structured error type for path-addressed tree and map operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapError {
    /// The address is valid but nothing lives there: a missing map key or a
    /// sequence index outside `[0, len)` after negative-index normalization.
    #[error("not found")]
    NotFound,

    /// The address is structurally invalid for the tree it walks: descending
    /// into a leaf, operating on a node of the wrong shape, or a path that
    /// ends where the shape forbids it.
    #[error("wrong path")]
    WrongPath,

    /// An index segment failed to parse as a base-10 integer. The parse error
    /// is surfaced verbatim so callers can detect malformed segments.
    #[error(transparent)]
    Index(#[from] std::num::ParseIntError),
}

impl MapError {
    /// Check if this error indicates the address resolved to nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MapError::NotFound)
    }

    /// Check if this error indicates a structurally invalid address.
    pub fn is_wrong_path(&self) -> bool {
        matches!(self, MapError::WrongPath)
    }

    /// Check if this error came from a malformed index segment.
    pub fn is_index_error(&self) -> bool {
        matches!(self, MapError::Index(_))
    }
}

// Conversion from MapError to the main Error type
impl From<MapError> for crate::Error {
    fn from(err: MapError) -> Self {
        crate::Error::Map(err)
    }
}
