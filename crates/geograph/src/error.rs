use thiserror::Error;

use crate::unit::UnitId;

/// Errors raised while building a contiguity graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// An input geometry is empty, degenerate, or self-intersecting, so its
    /// contiguity is undefined.
    #[error("invalid geometry for {unit}: {reason}")]
    InvalidGeometry { unit: UnitId, reason: String },

    /// The boundary tolerance is negative or not finite.
    #[error("contiguity tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}
