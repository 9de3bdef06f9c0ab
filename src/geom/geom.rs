use geo::{BooleanOps, BoundingRect, Contains, Coord, InteriorPoint, MultiPolygon, Rect};
use rstar::{RTree, AABB};

use crate::geom::BoundingBox;

/// Geometries represents a collection of non-overlapping MultiPolygons with spatial relationships.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes get no R-tree entry.
    pub fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
            shapes,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Query the R-tree for shapes whose bounding boxes intersect the envelope.
    #[inline]
    pub(crate) fn query(&self, envelope: &AABB<[f64; 2]>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(envelope).map(|bbox| bbox.idx())
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|polygon| polygon.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
    }

    /// Compute the union of the MultiPolygons at `indices`.
    /// This method may be slow for large numbers of complex polygons.
    pub fn union_of(&self, indices: impl IntoIterator<Item = usize>) -> MultiPolygon<f64> {
        indices.into_iter()
            .map(|i| self.shapes[i].clone())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| MultiPolygon(vec![]))
    }

    /// Find the shape containing a point, if any.
    pub fn locate(&self, x: f64, y: f64) -> Option<usize> {
        let point = geo::Point::new(x, y);
        let mut hits = self.query(&AABB::from_point([x, y]))
            .filter(|&i| self.shapes[i].contains(&point))
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits.first().copied()
    }

    /// For each shape in `self`, pick its interior point and find the shape in
    /// `other` that contains it.  `None` where no shape contains the point.
    pub fn crosswalk(&self, other: &Geometries) -> Vec<Option<usize>> {
        self.shapes.iter()
            .map(|shape| {
                shape.interior_point().and_then(|pt| other.locate(pt.x(), pt.y()))
            })
            .collect()
    }
}
