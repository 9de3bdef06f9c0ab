use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use geo::Area;
use serde_json::{json, Value};

use crate::{common, region::Region};

/// Regions as a GeoJSON FeatureCollection, one feature per region.
pub fn regions_to_geojson(regions: &[Region]) -> Value {
    let features = regions.iter()
        .map(|region| json!({
            "type": "Feature",
            "id": region.label,
            "properties": {
                "label": region.label,
                "areas": region.members.len(),
                "members": region.members.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
                "area": region.geometry.unsigned_area(),
            },
            "geometry": common::multipolygon_to_geojson(&region.geometry),
        }))
        .collect::<Vec<_>>();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Write regions as a GeoJSON FeatureCollection.
pub fn write_regions_geojson(path: &Path, regions: &[Region]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[write_regions_geojson] Failed to create {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &regions_to_geojson(regions))
        .with_context(|| format!("[write_regions_geojson] Failed to write {}", path.display()))
}
