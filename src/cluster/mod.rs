mod agglomerative;
mod assignment;
mod io;
mod kmeans;
mod preprocess;

pub use agglomerative::{Linkage, Merge, Regionalization, RegionalizationResult};
pub use assignment::ClusterAssignment;
pub use io::write_label_table;
pub use kmeans::{KMeans, KMeansResult};
pub use preprocess::standardize;
