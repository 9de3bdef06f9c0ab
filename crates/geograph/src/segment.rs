//! Planar segment measurements used by the contiguity tests.

use geo::algorithm::line_intersection::line_intersection;
use geo::{Coord, Line, MultiPolygon, Rect};

/// All non-degenerate boundary segments of a geometry: every ring (exterior
/// and holes) of every part.
pub fn boundary_segments(geom: &MultiPolygon<f64>) -> Vec<Line<f64>> {
    geom.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .flat_map(|ring| ring.lines())
        .filter(|line| line.start != line.end)
        .collect()
}

/// Whether the bounding box of `line`, padded by `tol`, overlaps `rect`.
#[inline]
pub fn line_near_rect(line: &Line<f64>, rect: &Rect<f64>, tol: f64) -> bool {
    let (min_x, max_x) = (line.start.x.min(line.end.x), line.start.x.max(line.end.x));
    let (min_y, max_y) = (line.start.y.min(line.end.y), line.start.y.max(line.end.y));
    min_x - tol <= rect.max().x && max_x + tol >= rect.min().x
        && min_y - tol <= rect.max().y && max_y + tol >= rect.min().y
}

#[inline]
fn dot(a: Coord<f64>, b: Coord<f64>) -> f64 { a.x * b.x + a.y * b.y }

#[inline]
fn cross(a: Coord<f64>, b: Coord<f64>) -> f64 { a.x * b.y - a.y * b.x }

/// Euclidean distance from `p` to the closed segment `seg`.
pub fn point_segment_distance(p: Coord<f64>, seg: &Line<f64>) -> f64 {
    let d = seg.delta();
    let len2 = dot(d, d);
    if len2 == 0.0 { return (p - seg.start).x.hypot((p - seg.start).y) }

    let t = (dot(p - seg.start, d) / len2).clamp(0.0, 1.0);
    let closest = seg.start + d * t;
    (p - closest).x.hypot((p - closest).y)
}

/// Euclidean distance between two closed segments (zero when they meet).
pub fn segment_distance(a: &Line<f64>, b: &Line<f64>) -> f64 {
    if line_intersection(*a, *b).is_some() { return 0.0 }

    point_segment_distance(a.start, b)
        .min(point_segment_distance(a.end, b))
        .min(point_segment_distance(b.start, a))
        .min(point_segment_distance(b.end, a))
}

/// Length of the run shared by two segments that lie on a common line,
/// within `tol` perpendicular distance.  Zero if they are not collinear or do
/// not overlap.
pub fn collinear_overlap(a: &Line<f64>, b: &Line<f64>, tol: f64) -> f64 {
    let d = a.delta();
    let len = d.x.hypot(d.y);
    if len == 0.0 { return 0.0 }

    // Both endpoints of `b` must sit on the supporting line of `a`.
    let offset = |p: Coord<f64>| cross(d, p - a.start).abs() / len;
    if offset(b.start) > tol || offset(b.end) > tol { return 0.0 }

    let t0 = dot(b.start - a.start, d) / len;
    let t1 = dot(b.end - a.start, d) / len;
    let lo = t0.min(t1).max(0.0);
    let hi = t0.max(t1).min(len);
    (hi - lo).max(0.0)
}
