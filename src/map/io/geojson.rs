use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use crate::{common, map::{AreaId, AreaLayer, AttributeTable}};

impl AreaLayer {
    /// Read a GeoJSON FeatureCollection of Polygon / MultiPolygon features.
    ///
    /// Area ids come from the `id_column` property when given, otherwise from
    /// the feature `id`, otherwise from the feature's position. Every property
    /// whose non-null values are all numbers becomes an attribute column;
    /// null or absent values are stored as missing.
    pub fn read_geojson(path: &Path, id_column: Option<&str>) -> Result<Self> {
        common::require_file_exists(path)?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("[AreaLayer::read_geojson] Failed to read {}", path.display()))?;
        Self::from_geojson_str(&text, id_column)
            .with_context(|| format!("[AreaLayer::read_geojson] Failed to parse {}", path.display()))
    }

    /// Parse a GeoJSON FeatureCollection held in memory.
    pub fn from_geojson_str(text: &str, id_column: Option<&str>) -> Result<Self> {
        let root: Value = serde_json::from_str(text).context("[geojson] invalid JSON")?;
        if root["type"].as_str() != Some("FeatureCollection") {
            bail!("[geojson] expected a FeatureCollection");
        }
        let features = root["features"].as_array()
            .ok_or_else(|| anyhow!("[geojson] FeatureCollection has no features array"))?;

        let mut ids = Vec::with_capacity(features.len());
        let mut shapes = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let id = feature_id(feature, id_column, i)?;
            let shape = common::geojson_to_multipolygon(&feature["geometry"])
                .with_context(|| format!("[geojson] feature {id} has unusable geometry"))?;
            ids.push(id);
            shapes.push(shape);
        }

        let attributes = numeric_properties(features, id_column)?;
        tracing::debug!("[AreaLayer::read_geojson] {} areas, {} numeric properties", ids.len(), attributes.num_columns());

        Ok(Self::new(ids, shapes, attributes)?)
    }
}

fn feature_id(feature: &Value, id_column: Option<&str>, position: usize) -> Result<AreaId> {
    let value = match id_column {
        Some(column) => match &feature["properties"][column] {
            Value::Null => bail!("[geojson] feature {position} has no {column:?} property"),
            value => value,
        },
        None => &feature["id"],
    };
    Ok(match value {
        Value::String(s) => AreaId::from(s.as_str()),
        Value::Number(n) => AreaId::from(n.to_string()),
        Value::Null => AreaId::from(position.to_string()),
        other => bail!("[geojson] feature {position} has a non-scalar id {other}"),
    })
}

/// Collect the numeric properties of every feature, columns ordered by name.
fn numeric_properties(features: &[Value], id_column: Option<&str>) -> Result<AttributeTable> {
    // None once a key is seen holding a non-numeric value
    let mut keys: BTreeMap<&str, Option<bool>> = BTreeMap::new();
    for feature in features {
        let Some(properties) = feature["properties"].as_object() else { continue };
        for (key, value) in properties {
            if Some(key.as_str()) == id_column { continue }
            let entry = keys.entry(key.as_str()).or_insert(Some(false));
            match value {
                Value::Number(_) => if let Some(seen) = entry { *seen = true },
                Value::Null => {}
                _ => *entry = None,
            }
        }
    }

    let columns = keys.into_iter()
        .filter(|(_, state)| *state == Some(true))
        .map(|(key, _)| {
            let column = features.iter()
                .map(|feature| feature["properties"][key].as_f64().unwrap_or(f64::NAN))
                .collect();
            (key.to_string(), column)
        })
        .collect::<Vec<_>>();

    if columns.is_empty() {
        return Ok(AttributeTable::empty(features.len()));
    }
    Ok(AttributeTable::from_columns(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "x",
              "properties": { "code": "E01", "rating": 4.5, "name": "Camden", "reviews": 10 },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] } },
            { "type": "Feature", "id": "y",
              "properties": { "code": "E02", "rating": null, "name": "Hackney", "reviews": 3 },
              "geometry": { "type": "MultiPolygon", "coordinates": [[[[1,0],[2,0],[2,1],[1,1],[1,0]]]] } }
        ]
    }"#;

    #[test]
    fn ids_from_named_property() {
        let layer = AreaLayer::from_geojson_str(SAMPLE, Some("code")).unwrap();
        assert_eq!(layer.ids(), &[AreaId::from("E01"), AreaId::from("E02")]);
        assert_eq!(layer.attributes().names(), &["rating".to_string(), "reviews".to_string()]);
        assert!(layer.attributes().row(1)[0].is_nan());
        assert_eq!(layer.column("reviews").unwrap(), vec![10.0, 3.0]);
    }

    #[test]
    fn ids_fall_back_to_feature_id() {
        let layer = AreaLayer::from_geojson_str(SAMPLE, None).unwrap();
        assert_eq!(layer.index_of("y"), Some(1));
    }

    #[test]
    fn missing_id_property_is_an_error() {
        assert!(AreaLayer::from_geojson_str(SAMPLE, Some("msoa")).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.geojson");
        fs::write(&path, SAMPLE).unwrap();
        let layer = AreaLayer::read_geojson(&path, Some("code")).unwrap();
        assert_eq!(layer.len(), 2);
        assert!(AreaLayer::read_geojson(&dir.path().join("none.geojson"), None).is_err());
    }
}
