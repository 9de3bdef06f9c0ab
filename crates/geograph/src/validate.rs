use geo::{Area, MultiPolygon, Validation};

use crate::{error::GraphError, unit::UnitId};

/// Reject geometries whose contiguity is undefined: empty shapes, parts with
/// zero area, and anything `geo` considers invalid (self-intersecting rings,
/// holes outside their shell, overlapping parts).
pub fn validate_geometry(unit: UnitId, geom: &MultiPolygon<f64>) -> Result<(), GraphError> {
    let invalid = |reason: &str| GraphError::InvalidGeometry { unit, reason: reason.to_string() };

    if geom.0.is_empty() { return Err(invalid("empty geometry")) }

    if let Some(part) = geom.0.iter().position(|polygon| polygon.unsigned_area() == 0.0) {
        return Err(invalid(&format!("part {part} has zero area")));
    }

    if !geom.is_valid() {
        return Err(invalid("self-intersecting or malformed rings"));
    }

    Ok(())
}
