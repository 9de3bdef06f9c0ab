use std::{cmp::Ordering, collections::BinaryHeap};

use ahash::AHashSet;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::{
    cluster::{preprocess::ensure_complete, standardize, ClusterAssignment},
    error::{ClusterError, ClusterResult},
    graph::NeighborGraph,
    map::AreaLayer,
};

/// Dissimilarity between two clusters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Increase in within-cluster sum of squares, `nA·nB/(nA+nB)·‖cA−cB‖²`.
    #[default]
    Ward,
    /// Mean Euclidean distance over member pairs.
    Average,
    /// Largest Euclidean distance over member pairs.
    Complete,
    /// Smallest Euclidean distance over member pairs.
    Single,
}

/// Connectivity-constrained agglomerative clustering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regionalization {
    pub k: usize,
    pub linkage: Linkage,
    /// Z-score attribute columns before clustering.
    pub standardize: bool,
}

impl Default for Regionalization {
    fn default() -> Self {
        Self { k: 5, linkage: Linkage::Ward, standardize: false }
    }
}

/// One merge step. Clusters are named by their smallest layer position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub cost: f64,
    /// Number of areas in the merged cluster.
    pub size: usize,
}

#[derive(Clone, Debug)]
pub struct RegionalizationResult {
    pub assignment: ClusterAssignment,
    /// Merges in the order they were applied.
    pub merges: Vec<Merge>,
}

/// Candidate merge of two adjacent clusters `a < b`.
#[derive(Copy, Clone, Eq, PartialEq)]
struct Entry {
    cost_bits: u64, // costs are non-negative, so to_bits() preserves order
    a: usize,
    b: usize,
    va: u32,
    vb: u32,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the cheapest pair, then the lowest pair, pops first.
        other.cost_bits.cmp(&self.cost_bits)
            .then_with(|| (other.a, other.b).cmp(&(self.a, self.b)))
            .then_with(|| (other.va, other.vb).cmp(&(self.va, self.vb)))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Live clusters indexed by their smallest member.
struct Clusters<'a> {
    data: &'a Array2<f64>,
    linkage: Linkage,
    alive: Vec<bool>,
    version: Vec<u32>,
    members: Vec<Vec<usize>>,
    sums: Vec<Array1<f64>>,
    adjacent: Vec<AHashSet<usize>>,
}

#[inline]
fn distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

impl<'a> Clusters<'a> {
    fn singletons(data: &'a Array2<f64>, graph: &NeighborGraph, linkage: Linkage) -> Self {
        let n = data.nrows();
        Self {
            data,
            linkage,
            alive: vec![true; n],
            version: vec![0; n],
            members: (0..n).map(|i| vec![i]).collect(),
            sums: data.axis_iter(Axis(0)).map(|row| row.to_owned()).collect(),
            adjacent: (0..n).map(|i| graph.neighbors(i).collect()).collect(),
        }
    }

    /// Euclidean distances between every member of `a` and every member of `b`.
    fn pair_distances(&self, a: usize, b: usize) -> impl Iterator<Item = f64> + '_ {
        let mb = &self.members[b];
        self.members[a].iter()
            .flat_map(move |&i| mb.iter().map(move |&j| distance(self.data.row(i), self.data.row(j))))
    }

    fn cost(&self, a: usize, b: usize) -> f64 {
        let (ma, mb) = (&self.members[a], &self.members[b]);
        match self.linkage {
            Linkage::Ward => {
                let (na, nb) = (ma.len() as f64, mb.len() as f64);
                let diff = &self.sums[a] / na - &self.sums[b] / nb;
                na * nb / (na + nb) * diff.dot(&diff)
            }
            Linkage::Average => self.pair_distances(a, b).sum::<f64>() / (ma.len() * mb.len()) as f64,
            Linkage::Complete => self.pair_distances(a, b).fold(0.0, f64::max),
            Linkage::Single => self.pair_distances(a, b).fold(f64::INFINITY, f64::min),
        }
    }

    fn entry(&self, a: usize, b: usize) -> Entry {
        let (a, b) = (a.min(b), a.max(b));
        Entry { cost_bits: self.cost(a, b).to_bits(), a, b, va: self.version[a], vb: self.version[b] }
    }

    #[inline]
    fn is_current(&self, e: &Entry) -> bool {
        self.alive[e.a] && self.alive[e.b] && self.version[e.a] == e.va && self.version[e.b] == e.vb
    }

    /// Fold `b` into `a` (`a < b`), returning the merged size.
    fn merge(&mut self, a: usize, b: usize) -> usize {
        self.alive[b] = false;
        self.version[a] = self.version[a].wrapping_add(1);

        let moved = std::mem::take(&mut self.members[b]);
        self.members[a].extend(moved);
        self.members[a].sort_unstable();
        let sum = std::mem::replace(&mut self.sums[b], Array1::zeros(0));
        self.sums[a] += &sum;

        // Neighbors of the union, minus the pair itself.
        let from_b = std::mem::take(&mut self.adjacent[b]);
        for &c in &from_b {
            if c == a { continue }
            self.adjacent[c].remove(&b);
            self.adjacent[c].insert(a);
            self.adjacent[a].insert(c);
        }
        self.adjacent[a].remove(&b);

        self.members[a].len()
    }
}

impl Regionalization {
    pub fn new(k: usize) -> Self {
        Self { k, ..Self::default() }
    }

    /// Regionalize the named attribute columns of a layer over its neighbor graph.
    pub fn fit<S: AsRef<str>>(&self, layer: &AreaLayer, graph: &NeighborGraph, attributes: &[S]) -> ClusterResult<RegionalizationResult> {
        if graph.ids() != layer.ids() {
            return Err(ClusterError::invalid_parameter("neighbor graph was built over a different layer"));
        }
        self.fit_matrix(&layer.matrix(attributes)?, graph)
    }

    /// Regionalize the rows of an N×D matrix; row `i` is graph node `i`.
    ///
    /// Starting from singletons, repeatedly merges the adjacent pair with the
    /// lowest linkage cost until `k` clusters remain. Equal costs go to the
    /// pair whose (smaller, larger) cluster names compare lowest.
    pub fn fit_matrix(&self, data: &Array2<f64>, graph: &NeighborGraph) -> ClusterResult<RegionalizationResult> {
        let n = data.nrows();
        if graph.len() != n {
            return Err(ClusterError::invalid_parameter(format!(
                "{n} rows for a neighbor graph over {} areas", graph.len()
            )));
        }
        if self.k == 0 || self.k > n {
            return Err(ClusterError::invalid_parameter(format!("k = {} must be in 1..={n}", self.k)));
        }
        ensure_complete(data, graph.ids())?;

        let components = graph.num_components();
        if components > self.k {
            return Err(ClusterError::DisconnectedGraph { k: self.k, components });
        }

        let data = if self.standardize { standardize(data) } else { data.clone() };
        let mut clusters = Clusters::singletons(&data, graph, self.linkage);

        let mut heap = BinaryHeap::<Entry>::with_capacity(graph.num_edges());
        for (a, b) in graph.edges() {
            heap.push(clusters.entry(a, b));
        }

        let mut merges = Vec::with_capacity(n - self.k);
        let mut remaining = n;
        while remaining > self.k {
            let Some(e) = heap.pop() else { break };
            if !clusters.is_current(&e) { continue }

            let size = clusters.merge(e.a, e.b);
            remaining -= 1;
            merges.push(Merge { left: e.a, right: e.b, cost: f64::from_bits(e.cost_bits), size });

            let mut next = clusters.adjacent[e.a].iter().copied().collect::<Vec<_>>();
            next.sort_unstable();
            for c in next {
                heap.push(clusters.entry(e.a, c));
            }

            if merges.len() % 1000 == 0 {
                tracing::debug!("[regionalize] {} merges, {} clusters left, heap {}", merges.len(), remaining, heap.len());
            }
        }

        if remaining > self.k {
            return Err(ClusterError::DisconnectedGraph { k: self.k, components: remaining });
        }

        // Owner of every area; cluster names already follow first appearance.
        let mut raw = vec![0u32; n];
        for (c, members) in clusters.members.iter().enumerate().filter(|&(c, _)| clusters.alive[c]) {
            members.iter().for_each(|&i| raw[i] = c as u32);
        }
        let assignment = ClusterAssignment::canonical(graph.ids().to_vec(), &raw);

        tracing::info!(
            "[regionalize] {:?} linkage: {} areas -> {} regions in {} merges",
            self.linkage, n, assignment.k(), merges.len(),
        );
        Ok(RegionalizationResult { assignment, merges })
    }
}
