use geograph::GraphError;
use thiserror::Error;

/// Failure kinds of the clustering pipeline.
///
/// Every stage either returns its full result or exactly one of these; there
/// are no partial results and nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    /// An area polygon is malformed (empty, zero area, self-intersecting).
    #[error("invalid geometry for area {area}: {reason}")]
    InvalidGeometry { area: String, reason: String },

    /// An attribute column holds undefined values.
    #[error("attribute {attribute:?} has {count} missing value(s), first at area {first}")]
    MissingData { attribute: String, count: usize, first: String },

    /// A caller-supplied parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The neighbor graph has more connected components than requested regions.
    #[error("cannot form {k} connected regions: neighbor graph has {components} components")]
    DisconnectedGraph { k: usize, components: usize },

    /// A label in the assignment has no member areas.
    #[error("cluster {label} has no member areas")]
    EmptyCluster { label: u32 },
}

impl ClusterError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Translate a graph-builder error, naming the area by identifier.
    pub(crate) fn from_graph(err: GraphError, ids: &[crate::AreaId]) -> Self {
        match err {
            GraphError::InvalidGeometry { unit, reason } => Self::InvalidGeometry {
                area: ids.get(unit.index()).map_or_else(|| unit.to_string(), |id| id.to_string()),
                reason,
            },
            GraphError::InvalidTolerance(tol) => {
                Self::invalid_parameter(format!("contiguity tolerance must be finite and non-negative, got {tol}"))
            }
        }
    }
}

pub type ClusterResult<T> = std::result::Result<T, ClusterError>;
