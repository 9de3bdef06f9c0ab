use std::{fmt, sync::Arc};

use geograph::{AdjacencyMatrix, Contiguity, ContiguityBuilder, UnitId};

use crate::{
    error::{ClusterError, ClusterResult},
    map::{AreaId, AreaLayer},
};

/// Undirected contiguity graph over the areas of a layer.
///
/// Node `i` is the area at layer position `i`; rows are sorted, symmetric,
/// and free of self-loops.
#[derive(Clone)]
pub struct NeighborGraph {
    ids: Arc<[AreaId]>,
    adj: AdjacencyMatrix,
    rule: Contiguity,
    tolerance: f64,
}

impl NeighborGraph {
    /// Build the contiguity graph of a layer's polygons.
    pub fn build(layer: &AreaLayer, rule: Contiguity, tolerance: f64) -> ClusterResult<Self> {
        let adj = ContiguityBuilder::new(rule)
            .tolerance(tolerance)
            .build(layer.shapes())
            .map_err(|err| ClusterError::from_graph(err, layer.ids()))?;

        let graph = Self { ids: layer.ids().into(), adj, rule, tolerance };
        tracing::info!(
            "[NeighborGraph::build] {:?} contiguity: {} areas, {} edges, {} islands, {} components",
            rule, graph.len(), graph.num_edges(), graph.adj.islands().len(), graph.num_components(),
        );
        Ok(graph)
    }

    /// Graph over `ids` from explicit index pairs, for layers whose adjacency
    /// is known without geometry.
    pub fn from_edges(ids: Vec<AreaId>, edges: impl IntoIterator<Item = (usize, usize)>) -> ClusterResult<Self> {
        let n = ids.len();
        let pairs = edges.into_iter()
            .map(|(a, b)| {
                if a >= n || b >= n {
                    return Err(ClusterError::invalid_parameter(format!("edge ({a}, {b}) out of range for {n} areas")));
                }
                Ok((UnitId::from(a), UnitId::from(b)))
            })
            .collect::<ClusterResult<Vec<_>>>()?;

        Ok(Self {
            ids: ids.into(),
            adj: AdjacencyMatrix::from_pairs(n, pairs),
            rule: Contiguity::default(),
            tolerance: 0.0,
        })
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline] pub fn ids(&self) -> &[AreaId] { &self.ids }

    #[inline] pub fn rule(&self) -> Contiguity { self.rule }

    #[inline] pub fn tolerance(&self) -> f64 { self.tolerance }

    /// Underlying CSR adjacency.
    #[inline] pub fn adjacency(&self) -> &AdjacencyMatrix { &self.adj }

    #[inline] pub fn num_edges(&self) -> usize { self.adj.num_edges() }

    #[inline] pub fn degree(&self, idx: usize) -> usize { self.adj.degree(UnitId::from(idx)) }

    /// Layer positions adjacent to `idx`, ascending.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj.neighbors(UnitId::from(idx)).iter().map(|u| u.index())
    }

    /// Identifiers of the areas adjacent to `id`, or `None` for an unknown id.
    pub fn neighbors_of(&self, id: &str) -> Option<Vec<&AreaId>> {
        let idx = self.ids.iter().position(|a| a.as_str() == id)?;
        Some(self.neighbors(idx).map(|j| &self.ids[j]).collect())
    }

    #[inline]
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.adj.contains(UnitId::from(a), UnitId::from(b))
    }

    /// Every undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj.edges().map(|(a, b)| (a.index(), b.index()))
    }

    /// Areas without neighbors.
    pub fn islands(&self) -> Vec<&AreaId> {
        self.adj.islands().into_iter().map(|u| &self.ids[u.index()]).collect()
    }

    #[inline] pub fn num_components(&self) -> usize { self.adj.num_components() }

    /// Component label per area, numbered by smallest member.
    #[inline] pub fn component_labels(&self) -> Vec<u32> { self.adj.component_labels() }

    /// Whether the given layer positions induce a connected subgraph.
    pub fn is_connected_subset(&self, indices: impl IntoIterator<Item = usize>) -> bool {
        self.adj.is_connected_subset(indices.into_iter().map(UnitId::from))
    }
}

impl fmt::Debug for NeighborGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeighborGraph")
            .field("rule", &self.rule)
            .field("tolerance", &self.tolerance)
            .field("areas", &self.len())
            .field("edges", &self.num_edges())
            .finish()
    }
}
