use std::io::Write;

use anyhow::Result;
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

/// Linear map from data coordinates into an SVG canvas (Y down), preserving aspect ratio.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projection {
    bounds: Rect<f64>,
    margin: f64,
    scale: f64,
}

impl Projection {
    /// Fit `bounds` into a canvas `width` wide; returns the projection and canvas height.
    pub(crate) fn fit(bounds: Rect<f64>, width: f64, margin: f64) -> (Self, f64) {
        let span = bounds.width().max(bounds.height()).max(f64::EPSILON);
        let scale = (width - 2.0 * margin) / span;
        let height = bounds.height() * scale + 2.0 * margin;
        (Self { bounds, margin, scale }, height)
    }

    #[inline]
    pub(crate) fn apply(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.margin + (coord.x - self.bounds.min().x) * self.scale;
        let y = self.margin + (self.bounds.max().y - coord.y) * self.scale;
        (x, y)
    }
}

/// Draw each polygon as one `<path>` with its fill colour.
pub(crate) fn draw_polygons_with_fill(writer: &mut impl Write, polygons: &[MultiPolygon<f64>], fills: &[String], project: &Projection) -> Result<()> {
    assert_eq!(fills.len(), polygons.len(),
        "[svg] length mismatch: {} colors for {} geometries",
        fills.len(),
        polygons.len(),
    );

    for (polygon, fill) in polygons.iter().zip(fills.iter()) {
        writeln!(writer, r#"<path class="area" fill-rule="evenodd" style="fill:{fill}" d="{}"/>"#, multipolygon_to_path(polygon, project))?;
    }
    Ok(())
}

/// Draw polygon outlines with no fill.
pub(crate) fn draw_outlines(writer: &mut impl Write, polygons: &[MultiPolygon<f64>], project: &Projection) -> Result<()> {
    for polygon in polygons {
        writeln!(writer, r#"<path class="outline" d="{}"/>"#, multipolygon_to_path(polygon, project))?;
    }
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), project, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, project, &mut out);
        }
    }

    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, project: &Projection, out: &mut String) {
    let mut coords = ring.coords_iter().map(|coord| project.apply(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn projection_flips_y_and_keeps_margin() {
        let bounds = Rect::new((0.0, 0.0), (10.0, 5.0));
        let (proj, height) = Projection::fit(bounds, 120.0, 10.0);
        assert_eq!(height, 70.0);
        assert_eq!(proj.apply(&Coord { x: 0.0, y: 5.0 }), (10.0, 10.0));
        assert_eq!(proj.apply(&Coord { x: 10.0, y: 0.0 }), (110.0, 60.0));
    }

    #[test]
    fn path_has_one_subpath_per_ring() {
        let bounds = Rect::new((0.0, 0.0), (4.0, 4.0));
        let (proj, _) = Projection::fit(bounds, 100.0, 0.0);
        let shape = MultiPolygon(vec![polygon![
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)]],
        ]]);
        let path = multipolygon_to_path(&shape, &proj);
        assert_eq!(path.matches('M').count(), 2);
        assert_eq!(path.matches('Z').count(), 2);
    }
}
