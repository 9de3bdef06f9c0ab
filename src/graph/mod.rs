mod neighbors;

pub use neighbors::NeighborGraph;
