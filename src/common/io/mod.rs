mod csv;
mod geojson;
mod svg;

pub(crate) use csv::*;
pub(crate) use geojson::*;
pub(crate) use svg::*;
