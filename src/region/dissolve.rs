use geo::MultiPolygon;

use crate::{
    cluster::ClusterAssignment,
    error::{ClusterError, ClusterResult},
    map::{AreaId, AreaLayer},
};

/// The union of all areas sharing a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub label: u32,
    pub members: Vec<AreaId>,
    pub geometry: MultiPolygon<f64>,
}

/// Dissolve the layer's polygons into one region per label, ordered by label.
pub fn dissolve(layer: &AreaLayer, assignment: &ClusterAssignment) -> ClusterResult<Vec<Region>> {
    if assignment.ids() != layer.ids() {
        return Err(ClusterError::invalid_parameter("assignment was computed over a different layer"));
    }

    let regions = (0..assignment.k() as u32)
        .map(|label| {
            let members = assignment.members(label);
            if members.is_empty() {
                return Err(ClusterError::EmptyCluster { label });
            }
            Ok(Region {
                label,
                members: members.iter().map(|&i| layer.ids()[i].clone()).collect(),
                geometry: layer.geometries().union_of(members),
            })
        })
        .collect::<ClusterResult<Vec<_>>>()?;

    tracing::info!("[dissolve] {} areas into {} regions", layer.len(), regions.len());
    Ok(regions)
}
