use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Convert a shapefile polygon into a `geo::MultiPolygon<f64>`.
///
/// Shapefile rings come flat as `[outer CW, hole CCW, hole CCW, outer CW, ...]`;
/// each outer ring starts a new part and collects the holes that follow it.
pub(crate) fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        if coords.first() != coords.last() { coords.push(coords[0]) }

        if let shp::PolygonRing::Outer(_) = ring {
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(LineString(coords));
        } else {
            holes.push(LineString(coords));
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}
