use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

/// Convert a MultiPolygon into a GeoJSON geometry object.
pub(crate) fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| ls.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>();

    let polygons = mp.0.iter()
        .map(|polygon| {
            std::iter::once(ring(polygon.exterior()))
                .chain(polygon.interiors().iter().map(ring))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

/// Parse a GeoJSON `Polygon` or `MultiPolygon` geometry object.
pub(crate) fn geojson_to_multipolygon(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("[geojson] geometry has no coordinates array"))?;

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon_coords(coords)?])),
        Some("MultiPolygon") => Ok(MultiPolygon(
            coords.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("[geojson] MultiPolygon member is not an array"))?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>>>()?
        )),
        Some(other) => bail!("[geojson] unsupported geometry type {other:?}; expected Polygon or MultiPolygon"),
        None => bail!("[geojson] geometry has no type"),
    }
}

/// Parse polygon rings: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| {
            let points = ring.as_array().ok_or_else(|| anyhow!("[geojson] ring is not an array"))?;
            parse_ring_coords(points)
        })
        .collect::<Result<Vec<_>>>()?;

    if rings.is_empty() { bail!("[geojson] polygon has no exterior ring") }
    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| {
            let x = pair[0].as_f64().context("[geojson] invalid coordinate: x must be a number")?;
            let y = pair[1].as_f64().context("[geojson] invalid coordinate: y must be a number")?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn polygon_with_hole_survives_a_round_trip() {
        let shape = MultiPolygon(vec![polygon![
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)]],
        ]]);
        let parsed = geojson_to_multipolygon(&multipolygon_to_geojson(&shape)).unwrap();
        assert_eq!(parsed, shape);
    }

    #[test]
    fn plain_polygon_is_promoted() {
        let geometry = json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]] });
        let parsed = geojson_to_multipolygon(&geometry).unwrap();
        assert_eq!(parsed.0.len(), 1);
        assert_eq!(parsed.0[0].exterior().0.len(), 4); // closed
    }

    #[test]
    fn points_are_rejected() {
        let geometry = json!({ "type": "Point", "coordinates": [0.0, 0.0] });
        assert!(geojson_to_multipolygon(&geometry).is_err());
    }
}
