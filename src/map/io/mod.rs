mod csv;
mod geojson;
mod shapefile;
mod svg;

use std::path::Path;

use anyhow::{bail, Result};

use crate::map::AreaLayer;

impl AreaLayer {
    /// Read a polygon layer, choosing the format by file extension
    /// (`.geojson` / `.json` or `.shp`).
    pub fn read(path: &Path, id_column: Option<&str>) -> Result<Self> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "geojson" | "json" => Self::read_geojson(path, id_column),
            "shp" => Self::read_shapefile(path, id_column),
            _ => bail!("[AreaLayer::read] Unsupported file extension {ext:?} for {}", path.display()),
        }
    }
}
