mod io;
mod moran;
mod weights;

pub use io::write_autocorrelation_csv;
pub use moran::{autocorrelation_table, moran_i, moran_test, MoranParams, MoranResult};
pub use weights::{spatial_lag, WeightTransform};
