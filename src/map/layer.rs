use std::fmt;

use ahash::AHashMap;
use geo::MultiPolygon;
use ndarray::{Array2, ArrayView1, Axis};

use crate::{
    error::{ClusterError, ClusterResult},
    geom::Geometries,
    map::{AreaId, AttributeTable},
};

/// A borrowed view of a single area: identifier, polygon, and attributes.
#[derive(Debug, Clone, Copy)]
pub struct Area<'a> {
    pub id: &'a AreaId,
    pub geometry: &'a MultiPolygon<f64>,
    pub attributes: ArrayView1<'a, f64>,
}

/// An ordered set of areas with their polygons and attribute table.
///
/// Immutable once built; every clustering stage reads from it and carries
/// `AreaId`s through to its output instead of relying on row order.
pub struct AreaLayer {
    ids: Vec<AreaId>,
    index: AHashMap<AreaId, u32>, // Map between area ids and contiguous indices
    geoms: Geometries,
    attributes: AttributeTable,
}

impl AreaLayer {
    /// Build a layer from parallel vectors of identifiers, shapes, and attribute rows.
    pub fn new(ids: Vec<AreaId>, shapes: Vec<MultiPolygon<f64>>, attributes: AttributeTable) -> ClusterResult<Self> {
        if ids.len() != shapes.len() || ids.len() != attributes.num_rows() {
            return Err(ClusterError::invalid_parameter(format!(
                "layer size mismatch: {} ids, {} shapes, {} attribute rows",
                ids.len(), shapes.len(), attributes.num_rows(),
            )));
        }

        let mut index = AHashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i as u32).is_some() {
                return Err(ClusterError::invalid_parameter(format!("duplicate area id {id}")));
            }
        }

        Ok(Self { ids, index, geoms: Geometries::new(shapes), attributes })
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline] pub fn ids(&self) -> &[AreaId] { &self.ids }

    /// Position of an area in layer order.
    #[inline]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| i as usize)
    }

    #[inline] pub fn geometries(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { self.geoms.shapes() }

    #[inline] pub fn attributes(&self) -> &AttributeTable { &self.attributes }

    /// Get a view of the area at a layer position.
    pub fn area(&self, idx: usize) -> Area<'_> {
        Area {
            id: &self.ids[idx],
            geometry: &self.geoms.shapes()[idx],
            attributes: self.attributes.row(idx),
        }
    }

    /// Iterate over all areas in layer order.
    pub fn areas(&self) -> impl Iterator<Item = Area<'_>> + '_ {
        (0..self.len()).map(|i| self.area(i))
    }

    /// Replace the attribute table, keeping ids and geometry.
    pub fn with_attributes(self, attributes: AttributeTable) -> ClusterResult<Self> {
        if attributes.num_rows() != self.len() {
            return Err(ClusterError::invalid_parameter(format!(
                "attribute table has {} rows, layer has {} areas", attributes.num_rows(), self.len()
            )));
        }
        Ok(Self { attributes, ..self })
    }

    /// A complete (NaN-free) copy of one attribute column.
    pub fn column(&self, name: &str) -> ClusterResult<Vec<f64>> {
        let idx = self.attributes.column_index(name)?;
        self.ensure_complete(idx)?;
        Ok(self.attributes.values().column(idx).to_vec())
    }

    /// A complete (NaN-free) N×D matrix of the named columns.
    pub fn matrix<S: AsRef<str>>(&self, names: &[S]) -> ClusterResult<Array2<f64>> {
        if names.is_empty() {
            return Err(ClusterError::invalid_parameter("at least one attribute column is required"));
        }
        let indices = names.iter()
            .map(|name| self.attributes.column_index(name.as_ref()))
            .collect::<ClusterResult<Vec<_>>>()?;
        for &idx in &indices { self.ensure_complete(idx)? }
        Ok(self.attributes.values().select(Axis(1), &indices))
    }

    /// For each area, the area of `other` containing its interior point.
    pub fn crosswalk<'a>(&self, other: &'a AreaLayer) -> Vec<Option<&'a AreaId>> {
        self.geoms.crosswalk(&other.geoms).into_iter()
            .map(|hit| hit.map(|j| &other.ids[j]))
            .collect()
    }

    fn ensure_complete(&self, column: usize) -> ClusterResult<()> {
        let missing = self.attributes.missing_rows(column);
        match missing.first() {
            None => Ok(()),
            Some(&first) => Err(ClusterError::MissingData {
                attribute: self.attributes.names()[column].clone(),
                count: missing.len(),
                first: self.ids[first].to_string(),
            }),
        }
    }
}

impl fmt::Debug for AreaLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaLayer")
            .field("areas", &self.len())
            .field("attributes", &self.attributes.names())
            .field("bounds", &self.geoms.bounds())
            .finish()
    }
}
