use geo::{BoundingRect, Line, MultiPolygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::{
    adj::AdjacencyMatrix,
    error::GraphError,
    segment::{boundary_segments, collinear_overlap, line_near_rect, segment_distance},
    unit::UnitId,
    validate::validate_geometry,
};

/// Rule deciding when two touching units count as neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contiguity {
    /// Shared boundary run of positive length.
    Rook,
    /// Any shared boundary point (vertex or edge).  Superset of Rook.
    #[default]
    Queen,
}

/// A padded bounding box in the R-tree, associated with a unit by index.
#[derive(Debug, Clone)]
struct UnitBox {
    unit: UnitId,
    bbox: Rect<f64>,
}

impl RTreeObject for UnitBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Builds an `AdjacencyMatrix` from polygon geometries.
///
/// Two boundaries "touch" when they come within `tolerance` of each other
/// (Queen), or when they run together for more than `tolerance` (Rook).  The
/// tolerance is in the units of the input coordinates; `0.0` demands exact
/// floating-point contact.
#[derive(Clone, Copy, Debug)]
pub struct ContiguityBuilder {
    rule: Contiguity,
    tolerance: f64,
}

impl Default for ContiguityBuilder {
    fn default() -> Self { Self::new(Contiguity::Queen) }
}

impl ContiguityBuilder {
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    pub fn new(rule: Contiguity) -> Self {
        Self { rule, tolerance: Self::DEFAULT_TOLERANCE }
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline] pub fn rule(&self) -> Contiguity { self.rule }

    /// Validate every geometry, then test each pair of units whose padded
    /// bounding boxes intersect.
    pub fn build(&self, geoms: &[MultiPolygon<f64>]) -> Result<AdjacencyMatrix, GraphError> {
        let tol = self.tolerance;
        if !tol.is_finite() || tol < 0.0 { return Err(GraphError::InvalidTolerance(tol)) }

        let mut bounds = Vec::with_capacity(geoms.len());
        for (i, geom) in geoms.iter().enumerate() {
            let unit = UnitId::from(i);
            validate_geometry(unit, geom)?;
            let rect = geom.bounding_rect()
                .ok_or_else(|| GraphError::InvalidGeometry { unit, reason: "no bounding box".into() })?;
            bounds.push(rect);
        }

        let segments = geoms.iter().map(boundary_segments).collect::<Vec<_>>();

        let rtree = RTree::bulk_load(
            bounds.iter().enumerate()
                .map(|(i, rect)| UnitBox { unit: UnitId::from(i), bbox: pad(rect, tol) })
                .collect()
        );

        let mut pairs = Vec::new();
        for i in 0..geoms.len() {
            let search = AABB::from_corners(
                [bounds[i].min().x - tol, bounds[i].min().y - tol],
                [bounds[i].max().x + tol, bounds[i].max().y + tol],
            );

            let mut candidates = rtree.locate_in_envelope_intersecting(&search)
                .map(|cand| cand.unit.index())
                .filter(|&j| j > i) // check each unordered pair once
                .collect::<Vec<_>>();
            candidates.sort_unstable();

            for j in candidates {
                if self.touches(&segments[i], &bounds[i], &segments[j], &bounds[j]) {
                    pairs.push((UnitId::from(i), UnitId::from(j)));
                }
            }
        }

        let adj = AdjacencyMatrix::from_pairs(geoms.len(), pairs);
        tracing::debug!(
            "[contiguity] {:?} graph over {} units: {} edges, {} islands",
            self.rule, adj.num_units(), adj.num_edges(), adj.islands().len(),
        );
        Ok(adj)
    }

    /// Contact test between two units' boundary segments.
    fn touches(&self, a: &[Line<f64>], a_rect: &Rect<f64>, b: &[Line<f64>], b_rect: &Rect<f64>) -> bool {
        let tol = self.tolerance;

        // Only segments near the other unit's box can take part in a contact.
        let a_near = a.iter().filter(|s| line_near_rect(s, b_rect, tol)).collect::<Vec<_>>();
        let b_near = b.iter().filter(|s| line_near_rect(s, a_rect, tol)).collect::<Vec<_>>();

        match self.rule {
            Contiguity::Queen => a_near.iter().any(|sa| {
                b_near.iter().any(|sb| segment_distance(sa, sb) <= tol)
            }),
            Contiguity::Rook => {
                let mut shared = 0.0;
                for sa in &a_near {
                    for sb in &b_near {
                        shared += collinear_overlap(sa, sb, tol);
                        if shared > tol { return true }
                    }
                }
                false
            }
        }
    }
}

fn pad(rect: &Rect<f64>, tol: f64) -> Rect<f64> {
    Rect::new(
        (rect.min().x - tol, rect.min().y - tol),
        (rect.max().x + tol, rect.max().y + tol),
    )
}
