use ahash::AHashSet;
use ndarray::{Array2, ArrayView1, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    cluster::{assignment::canonical_labels, preprocess::ensure_complete, standardize, ClusterAssignment},
    error::{ClusterError, ClusterResult},
    map::{AreaId, AreaLayer},
};

/// Lloyd's k-means with k-means++ seeding and seeded restarts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeans {
    pub k: usize,
    pub restarts: usize,
    pub max_iterations: usize,
    /// Convergence threshold on the summed squared centroid shift.
    pub tolerance: f64,
    pub seed: u64,
    /// Z-score attribute columns before clustering.
    pub standardize: bool,
}

impl Default for KMeans {
    fn default() -> Self {
        Self { k: 5, restarts: 10, max_iterations: 300, tolerance: 1e-4, seed: 0, standardize: false }
    }
}

/// Best of all restarts.
#[derive(Clone, Debug)]
pub struct KMeansResult {
    pub assignment: ClusterAssignment,
    /// One row per label, in the (possibly standardized) feature space.
    pub centroids: Array2<f64>,
    /// Within-cluster sum of squares.
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart.
    pub iterations: usize,
    /// The data holds fewer than `k` distinct vectors.
    pub degenerate: bool,
}

/// State of one Lloyd run.
struct Run {
    labels: Vec<u32>,
    centroids: Array2<f64>,
    inertia: f64,
    iterations: usize,
}

#[inline]
fn sq_dist(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self { k, ..Self::default() }
    }

    /// Cluster the named attribute columns of a layer.
    pub fn fit<S: AsRef<str>>(&self, layer: &AreaLayer, attributes: &[S]) -> ClusterResult<KMeansResult> {
        self.fit_matrix(layer.ids(), &layer.matrix(attributes)?)
    }

    /// Cluster the rows of an N×D matrix; row `i` belongs to `ids[i]`.
    pub fn fit_matrix(&self, ids: &[AreaId], data: &Array2<f64>) -> ClusterResult<KMeansResult> {
        let n = data.nrows();
        if ids.len() != n {
            return Err(ClusterError::invalid_parameter(format!("{} ids for {n} rows", ids.len())));
        }
        if self.k == 0 || self.k > n {
            return Err(ClusterError::invalid_parameter(format!("k = {} must be in 1..={n}", self.k)));
        }
        if self.restarts == 0 {
            return Err(ClusterError::invalid_parameter("restarts must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::invalid_parameter("max_iterations must be at least 1"));
        }
        ensure_complete(data, ids)?;

        let data = if self.standardize { standardize(data) } else { data.clone() };

        let distinct = data.axis_iter(Axis(0))
            .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<_>>())
            .collect::<AHashSet<_>>()
            .len();
        let degenerate = distinct < self.k;
        if degenerate {
            tracing::warn!("[kmeans] only {distinct} distinct vectors for k = {}; some clusters will coincide", self.k);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<Run> = None;
        for restart in 0..self.restarts {
            let run = self.lloyd(&data, &mut rng);
            tracing::debug!("[kmeans] restart {restart}: inertia {:.6} after {} iterations", run.inertia, run.iterations);
            // Strict comparison keeps the earliest run on ties.
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        let best = best.ok_or_else(|| ClusterError::invalid_parameter("no k-means restart completed"))?;

        // Canonical labels, with centroid rows reordered to match.
        let (labels, k) = canonical_labels(&best.labels);
        let mut centroids = Array2::zeros((k, data.ncols()));
        for (&raw, &label) in best.labels.iter().zip(&labels) {
            centroids.row_mut(label as usize).assign(&best.centroids.row(raw as usize));
        }

        tracing::info!("[kmeans] k = {}: inertia {:.6} ({} restarts)", self.k, best.inertia, self.restarts);
        Ok(KMeansResult {
            assignment: ClusterAssignment::canonical(ids.to_vec(), &labels),
            centroids,
            inertia: best.inertia,
            iterations: best.iterations,
            degenerate,
        })
    }

    /// k-means++: first centre uniform, then proportional to squared distance
    /// from the nearest chosen centre.
    fn seed_centroids(&self, data: &Array2<f64>, rng: &mut impl Rng) -> Array2<f64> {
        use rand::distr::{weighted::WeightedIndex, Distribution};

        let n = data.nrows();
        let mut centroids = Array2::zeros((self.k, data.ncols()));
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        let mut d2 = data.axis_iter(Axis(0))
            .map(|row| sq_dist(row, data.row(first)))
            .collect::<Vec<_>>();

        for c in 1..self.k {
            let pick = match WeightedIndex::new(&d2) {
                Ok(dist) => dist.sample(rng),
                Err(_) => rng.random_range(0..n), // every point already coincides with a centre
            };
            centroids.row_mut(c).assign(&data.row(pick));
            for (i, row) in data.axis_iter(Axis(0)).enumerate() {
                d2[i] = d2[i].min(sq_dist(row, data.row(pick)));
            }
        }
        centroids
    }

    fn lloyd(&self, data: &Array2<f64>, rng: &mut impl Rng) -> Run {
        let (n, k) = (data.nrows(), self.k);
        let mut centroids = self.seed_centroids(data, rng);
        let mut labels = vec![0u32; n];
        let mut dist = vec![0.0; n];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            // Assignment step; ties go to the lowest centre.
            for (i, row) in data.axis_iter(Axis(0)).enumerate() {
                let (label, d) = centroids.axis_iter(Axis(0))
                    .map(|c| sq_dist(row, c))
                    .enumerate()
                    .fold((0, f64::INFINITY), |best, (c, d)| if d < best.1 { (c, d) } else { best });
                labels[i] = label as u32;
                dist[i] = d;
            }

            // Update step.
            let mut sums = Array2::<f64>::zeros((k, data.ncols()));
            let mut sizes = vec![0usize; k];
            for (i, row) in data.axis_iter(Axis(0)).enumerate() {
                sums.row_mut(labels[i] as usize).scaled_add(1.0, &row);
                sizes[labels[i] as usize] += 1;
            }

            let mut updated = centroids.clone();
            for c in 0..k {
                if sizes[c] > 0 {
                    updated.row_mut(c).assign(&(&sums.row(c) / sizes[c] as f64));
                    continue;
                }
                // Re-seed an empty cluster with the point farthest from its
                // centre, taken from a cluster that can spare it.
                let far = (0..n)
                    .filter(|&i| sizes[labels[i] as usize] > 1)
                    .fold(None, |best: Option<usize>, i| match best {
                        Some(b) if dist[b] >= dist[i] => Some(b),
                        _ => Some(i),
                    });
                if let Some(i) = far {
                    sizes[labels[i] as usize] -= 1;
                    sizes[c] = 1;
                    labels[i] = c as u32;
                    dist[i] = 0.0;
                    updated.row_mut(c).assign(&data.row(i));
                }
            }

            let shift = updated.axis_iter(Axis(0))
                .zip(centroids.axis_iter(Axis(0)))
                .map(|(a, b)| sq_dist(a, b))
                .sum::<f64>();
            centroids = updated;
            if shift <= self.tolerance { break }
        }

        let inertia = data.axis_iter(Axis(0))
            .zip(&labels)
            .map(|(row, &l)| sq_dist(row, centroids.row(l as usize)))
            .sum::<f64>();

        Run { labels, centroids, inertia, iterations }
    }
}
