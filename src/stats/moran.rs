use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ClusterError, ClusterResult},
    graph::NeighborGraph,
    map::AreaLayer,
    stats::WeightTransform,
};

/// Inputs of the permutation test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoranParams {
    pub transform: WeightTransform,
    pub permutations: usize,
    pub seed: u64,
}

impl Default for MoranParams {
    fn default() -> Self {
        Self { transform: WeightTransform::Row, permutations: 999, seed: 0 }
    }
}

/// Global Moran's I with permutation inference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MoranResult {
    /// Observed statistic.
    pub statistic: f64,
    /// Expectation under spatial randomness, `-1 / (N - 1)`.
    pub expected: f64,
    /// One-sided pseudo p-value in the direction of the observed statistic.
    pub p_value: f64,
    /// `(I - mean(I_perm)) / sd(I_perm)`; zero when every permutation agrees.
    pub z_score: f64,
    pub permutations: usize,
}

/// Deviations from the mean, after checking the column can be tested.
fn centered(values: &[f64], graph: &NeighborGraph) -> ClusterResult<Vec<f64>> {
    let n = values.len();
    if n != graph.len() {
        return Err(ClusterError::invalid_parameter(format!(
            "{n} values for a neighbor graph over {} areas", graph.len()
        )));
    }
    if n < 2 {
        return Err(ClusterError::invalid_parameter("Moran's I needs at least two areas"));
    }

    let missing = values.iter()
        .enumerate()
        .filter_map(|(i, v)| v.is_nan().then_some(i))
        .collect::<Vec<_>>();
    if let Some(&first) = missing.first() {
        return Err(ClusterError::MissingData {
            attribute: "values".into(),
            count: missing.len(),
            first: graph.ids()[first].to_string(),
        });
    }
    if values.iter().all(|&v| v == values[0]) {
        return Err(ClusterError::invalid_parameter("attribute has zero variance"));
    }
    if graph.num_edges() == 0 {
        return Err(ClusterError::invalid_parameter("neighbor graph has no edges"));
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    Ok(values.iter().map(|v| v - mean).collect())
}

/// `(N / S0) · Σ_i z_i Σ_j w_ij z_j / Σ_i z_i²` for centered values.
fn statistic(z: &[f64], m2: f64, s0: f64, graph: &NeighborGraph, transform: WeightTransform) -> f64 {
    let cross = (0..z.len())
        .map(|i| z[i] * transform.row_weight(graph, i) * graph.neighbors(i).map(|j| z[j]).sum::<f64>())
        .sum::<f64>();
    (z.len() as f64 / s0) * cross / m2
}

/// Observed global Moran's I of a complete column.
pub fn moran_i(values: &[f64], graph: &NeighborGraph, transform: WeightTransform) -> ClusterResult<f64> {
    let z = centered(values, graph)?;
    let m2 = z.iter().map(|v| v * v).sum::<f64>();
    Ok(statistic(&z, m2, transform.total(graph), graph, transform))
}

/// Moran's I with a pseudo p-value from `params.permutations` random
/// relabelings of the values, drawn from a generator seeded with `params.seed`.
pub fn moran_test(values: &[f64], graph: &NeighborGraph, params: &MoranParams) -> ClusterResult<MoranResult> {
    use rand::seq::SliceRandom;

    if params.permutations == 0 {
        return Err(ClusterError::invalid_parameter("permutations must be at least 1"));
    }

    let mut z = centered(values, graph)?;
    let m2 = z.iter().map(|v| v * v).sum::<f64>();
    let s0 = params.transform.total(graph);
    let observed = statistic(&z, m2, s0, graph, params.transform);

    let mut rng = StdRng::seed_from_u64(params.seed);
    let simulated = (0..params.permutations)
        .map(|_| {
            z.shuffle(&mut rng);
            statistic(&z, m2, s0, graph, params.transform)
        })
        .collect::<Vec<_>>();

    // Fold to the tail the observed value lies in.
    let mut larger = simulated.iter().filter(|&&s| s >= observed).count();
    if params.permutations - larger < larger {
        larger = params.permutations - larger;
    }
    let p_value = (larger + 1) as f64 / (params.permutations + 1) as f64;

    let mean = simulated.iter().sum::<f64>() / simulated.len() as f64;
    let var = simulated.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / simulated.len() as f64;
    let z_score = if var > 0.0 { (observed - mean) / var.sqrt() } else { 0.0 };

    Ok(MoranResult {
        statistic: observed,
        expected: -1.0 / (values.len() as f64 - 1.0),
        p_value,
        z_score,
        permutations: params.permutations,
    })
}

/// Test several attribute columns of a layer against the same graph.
///
/// Every column uses the same seed, so a column's result does not depend on
/// which other columns are tested alongside it.
pub fn autocorrelation_table<S: AsRef<str>>(
    layer: &AreaLayer,
    graph: &NeighborGraph,
    attributes: &[S],
    params: &MoranParams,
) -> ClusterResult<Vec<(String, MoranResult)>> {
    attributes.iter()
        .map(|name| {
            let name = name.as_ref();
            let result = moran_test(&layer.column(name)?, graph, params)?;
            tracing::info!(
                "[moran] {name}: I = {:.4} (E[I] = {:.4}), z = {:.2}, p = {:.4}",
                result.statistic, result.expected, result.z_score, result.p_value,
            );
            Ok((name.to_string(), result))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::map::AreaId;

    fn ids(n: usize) -> Vec<AreaId> {
        (0..n).map(|i| AreaId::from(format!("A{i}"))).collect()
    }

    fn path(n: usize) -> NeighborGraph {
        NeighborGraph::from_edges(ids(n), (1..n).map(|i| (i - 1, i))).unwrap()
    }

    /// Rook adjacency on a `w`×`h` lattice, row-major.
    fn lattice(w: usize, h: usize) -> NeighborGraph {
        let mut edges = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if x + 1 < w { edges.push((i, i + 1)) }
                if y + 1 < h { edges.push((i, i + w)) }
            }
        }
        NeighborGraph::from_edges(ids(w * h), edges).unwrap()
    }

    #[test]
    fn hand_computed_statistics() {
        let graph = path(4);
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(moran_i(&values, &graph, WeightTransform::Row).unwrap(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(moran_i(&values, &graph, WeightTransform::Binary).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn checkerboard_is_perfectly_dispersed() {
        let graph = lattice(4, 4);
        let values = (0..16).map(|i| ((i % 4 + i / 4) % 2) as f64).collect::<Vec<_>>();
        let result = moran_test(&values, &graph, &MoranParams::default()).unwrap();

        assert_relative_eq!(result.statistic, -1.0, epsilon = 1e-12);
        assert_relative_eq!(result.expected, -1.0 / 15.0, epsilon = 1e-12);
        assert!(result.p_value < 0.01);
        assert!(result.z_score < 0.0);
    }

    #[test]
    fn gradient_is_clustered() {
        let graph = lattice(5, 5);
        let values = (0..25).map(|i| (i % 5) as f64).collect::<Vec<_>>();
        let result = moran_test(&values, &graph, &MoranParams { permutations: 199, ..Default::default() }).unwrap();
        assert!(result.statistic > 0.5);
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
        assert!(result.z_score > 0.0);
    }

    #[test]
    fn same_seed_same_p_value() {
        let graph = lattice(3, 3);
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0];
        let params = MoranParams { permutations: 99, seed: 7, ..Default::default() };
        let a = moran_test(&values, &graph, &params).unwrap();
        let b = moran_test(&values, &graph, &params).unwrap();
        assert_eq!(a, b);
        assert!(a.p_value >= 0.01 && a.p_value <= 1.0);
    }

    #[test]
    fn rejects_untestable_input() {
        let graph = path(3);
        assert!(matches!(moran_i(&[1.0, 1.0, 1.0], &graph, WeightTransform::Row), Err(ClusterError::InvalidParameter(_))));
        assert!(matches!(moran_i(&[1.0, 2.0], &graph, WeightTransform::Row), Err(ClusterError::InvalidParameter(_))));
        assert!(matches!(moran_i(&[1.0, f64::NAN, 2.0], &graph, WeightTransform::Row), Err(ClusterError::MissingData { .. })));

        let no_edges = NeighborGraph::from_edges(ids(3), Vec::new()).unwrap();
        assert!(matches!(moran_i(&[1.0, 2.0, 3.0], &no_edges, WeightTransform::Row), Err(ClusterError::InvalidParameter(_))));

        let single = NeighborGraph::from_edges(ids(1), Vec::new()).unwrap();
        assert!(matches!(moran_i(&[1.0], &single, WeightTransform::Row), Err(ClusterError::InvalidParameter(_))));

        let params = MoranParams { permutations: 0, ..Default::default() };
        assert!(matches!(moran_test(&[1.0, 2.0, 3.0], &graph, &params), Err(ClusterError::InvalidParameter(_))));
    }
}
