mod dissolve;
mod io;

pub use dissolve::{dissolve, Region};
pub use io::{regions_to_geojson, write_regions_geojson};
