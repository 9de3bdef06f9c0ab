use std::sync::Arc;

use crate::{
    error::{ClusterError, ClusterResult},
    graph::NeighborGraph,
    map::AreaId,
};

/// A label in `[0, k)` for every area, keyed by area identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    ids: Arc<[AreaId]>,
    labels: Vec<u32>,
    k: usize,
}

impl ClusterAssignment {
    /// Wrap explicit labels. Every label must lie in `[0, k)`; labels need not
    /// all be used.
    pub fn new(ids: impl Into<Arc<[AreaId]>>, labels: Vec<u32>, k: usize) -> ClusterResult<Self> {
        let ids = ids.into();
        if ids.len() != labels.len() {
            return Err(ClusterError::invalid_parameter(format!(
                "{} labels for {} areas", labels.len(), ids.len()
            )));
        }
        if let Some(&label) = labels.iter().find(|&&l| l as usize >= k) {
            return Err(ClusterError::invalid_parameter(format!("label {label} out of range for k = {k}")));
        }
        Ok(Self { ids, labels, k })
    }

    /// Relabel so that labels are numbered by first appearance in layer
    /// order; `k` becomes the number of distinct labels.
    pub(crate) fn canonical(ids: impl Into<Arc<[AreaId]>>, raw: &[u32]) -> Self {
        let (labels, k) = canonical_labels(raw);
        Self { ids: ids.into(), labels, k }
    }

    #[inline] pub fn len(&self) -> usize { self.labels.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Number of labels.
    #[inline] pub fn k(&self) -> usize { self.k }

    #[inline] pub fn ids(&self) -> &[AreaId] { &self.ids }

    /// Labels in layer order.
    #[inline] pub fn labels(&self) -> &[u32] { &self.labels }

    /// Label of an area by identifier.
    pub fn label_of(&self, id: &str) -> Option<u32> {
        self.ids.iter().position(|a| a.as_str() == id).map(|i| self.labels[i])
    }

    /// `(id, label)` pairs in layer order.
    pub fn iter(&self) -> impl Iterator<Item = (&AreaId, u32)> + '_ {
        self.ids.iter().zip(self.labels.iter().copied())
    }

    /// Layer positions carrying `label`, ascending.
    pub fn members(&self, label: u32) -> Vec<usize> {
        self.labels.iter()
            .enumerate()
            .filter_map(|(i, &l)| (l == label).then_some(i))
            .collect()
    }

    /// Identifiers of the areas carrying `label`.
    pub fn member_ids(&self, label: u32) -> Vec<&AreaId> {
        self.members(label).into_iter().map(|i| &self.ids[i]).collect()
    }

    /// Number of areas per label.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        self.labels.iter().for_each(|&l| sizes[l as usize] += 1);
        sizes
    }

    /// Whether every label class induces a connected subgraph.
    pub fn is_contiguous(&self, graph: &NeighborGraph) -> bool {
        assert_eq!(graph.len(), self.len(), "graph and assignment cover different areas");
        (0..self.k as u32).all(|label| graph.is_connected_subset(self.members(label)))
    }

    /// Number the labels by first appearance in layer order.
    pub fn canonicalized(&self) -> Self {
        Self::canonical(self.ids.clone(), &self.labels)
    }
}

/// Map labels to `0, 1, ...` in order of first appearance.
pub(crate) fn canonical_labels(raw: &[u32]) -> (Vec<u32>, usize) {
    let mut map = ahash::AHashMap::new();
    let labels = raw.iter()
        .map(|&l| {
            let next = map.len() as u32;
            *map.entry(l).or_insert(next)
        })
        .collect();
    (labels, map.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<AreaId> {
        (0..n).map(|i| AreaId::from(format!("A{i}"))).collect()
    }

    #[test]
    fn canonical_numbering_follows_first_appearance() {
        let assignment = ClusterAssignment::canonical(ids(5), &[7, 7, 2, 9, 2]);
        assert_eq!(assignment.labels(), &[0, 0, 1, 2, 1]);
        assert_eq!(assignment.k(), 3);
        assert_eq!(assignment.sizes(), vec![2, 2, 1]);
        assert_eq!(assignment.label_of("A3"), Some(2));
        assert_eq!(assignment.label_of("B"), None);
    }

    #[test]
    fn explicit_labels_are_checked() {
        assert!(ClusterAssignment::new(ids(2), vec![0, 3], 3).is_err());
        assert!(ClusterAssignment::new(ids(2), vec![0], 3).is_err());

        let sparse = ClusterAssignment::new(ids(2), vec![2, 0], 3).unwrap();
        assert_eq!(sparse.sizes(), vec![1, 0, 1]);
        assert_eq!(sparse.canonicalized().labels(), &[0, 1]);
    }

    #[test]
    fn contiguity_check() {
        let graph = NeighborGraph::from_edges(ids(4), [(0, 1), (1, 2), (2, 3)]).unwrap();
        let split = ClusterAssignment::new(ids(4), vec![0, 0, 1, 1], 2).unwrap();
        let broken = ClusterAssignment::new(ids(4), vec![0, 1, 1, 0], 2).unwrap();
        assert!(split.is_contiguous(&graph));
        assert!(!broken.is_contiguous(&graph));
        assert_eq!(split.member_ids(1), vec![&AreaId::from("A2"), &AreaId::from("A3")]);
    }
}
