use serde::{Deserialize, Serialize};

use crate::graph::NeighborGraph;

/// How contiguity edges are turned into spatial weights `w_ij`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTransform {
    /// `w_ij = 1 / degree(i)`; every non-island row sums to one.
    #[default]
    Row,
    /// `w_ij = 1` for every neighbor.
    Binary,
}

impl WeightTransform {
    /// Weight of each edge leaving area `i`.
    #[inline]
    pub(crate) fn row_weight(self, graph: &NeighborGraph, i: usize) -> f64 {
        match self {
            WeightTransform::Binary => 1.0,
            WeightTransform::Row => match graph.degree(i) {
                0 => 0.0,
                d => 1.0 / d as f64,
            },
        }
    }

    /// Sum of all weights, `S0`.
    pub(crate) fn total(self, graph: &NeighborGraph) -> f64 {
        match self {
            WeightTransform::Binary => 2.0 * graph.num_edges() as f64,
            WeightTransform::Row => (0..graph.len()).filter(|&i| graph.degree(i) > 0).count() as f64,
        }
    }
}

/// Spatially lagged values: `lag_i = Σ_j w_ij x_j`. Islands get zero.
///
/// Panics if `values` does not have one entry per graph node.
pub fn spatial_lag(values: &[f64], graph: &NeighborGraph, transform: WeightTransform) -> Vec<f64> {
    assert_eq!(values.len(), graph.len(), "values.len() must equal the number of areas");
    (0..graph.len())
        .map(|i| transform.row_weight(graph, i) * graph.neighbors(i).map(|j| values[j]).sum::<f64>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::AreaId;

    fn path(n: usize) -> NeighborGraph {
        let ids = (0..n).map(|i| AreaId::from(i.to_string())).collect();
        NeighborGraph::from_edges(ids, (1..n).map(|i| (i - 1, i))).unwrap()
    }

    #[test]
    fn row_standardized_lag_averages_neighbors() {
        let lag = spatial_lag(&[1.0, 2.0, 6.0], &path(3), WeightTransform::Row);
        assert_eq!(lag, vec![2.0, 3.5, 2.0]);
    }

    #[test]
    fn binary_lag_sums_neighbors() {
        let lag = spatial_lag(&[1.0, 2.0, 6.0], &path(3), WeightTransform::Binary);
        assert_eq!(lag, vec![2.0, 7.0, 2.0]);
    }

    #[test]
    fn weight_totals() {
        let ids = (0..4).map(|i| AreaId::from(i.to_string())).collect();
        let graph = NeighborGraph::from_edges(ids, [(0, 1), (1, 2)]).unwrap(); // 3 is an island
        assert_eq!(WeightTransform::Binary.total(&graph), 4.0);
        assert_eq!(WeightTransform::Row.total(&graph), 3.0);
        assert_eq!(spatial_lag(&[1.0, 1.0, 1.0, 9.0], &graph, WeightTransform::Row)[3], 0.0);
    }
}
