pub mod adj;
pub mod contiguity;
pub mod error;
pub mod segment;
pub mod topo;
pub mod unit;
pub mod validate;

pub use adj::AdjacencyMatrix;
pub use contiguity::{Contiguity, ContiguityBuilder};
pub use error::GraphError;
pub use unit::UnitId;
pub use validate::validate_geometry;
