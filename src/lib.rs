#![doc = "geoclust public API"]
mod analysis;
mod cluster;
mod common;
mod config;
mod error;
mod geom;
mod graph;
mod map;
mod region;
mod stats;

#[doc(inline)]
pub use analysis::{Analysis, Report};

#[doc(inline)]
pub use cluster::{
    standardize, write_label_table, ClusterAssignment, KMeans, KMeansResult, Linkage, Merge, Regionalization,
    RegionalizationResult,
};

#[doc(inline)]
pub use config::{AnalysisConfig, KMeansConfig, RegionalizationConfig};

#[doc(inline)]
pub use error::{ClusterError, ClusterResult};

#[doc(inline)]
pub use geom::Geometries;

#[doc(inline)]
pub use graph::NeighborGraph;

#[doc(inline)]
pub use map::{Area, AreaId, AreaLayer, AttributeTable};

#[doc(inline)]
pub use region::{dissolve, regions_to_geojson, write_regions_geojson, Region};

#[doc(inline)]
pub use stats::{
    autocorrelation_table, moran_i, moran_test, spatial_lag, write_autocorrelation_csv, MoranParams, MoranResult,
    WeightTransform,
};

pub use geograph::Contiguity;
