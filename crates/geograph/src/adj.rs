use crate::unit::UnitId;

/// A read-only CSR (Compressed Sparse Row) adjacency matrix over units.
///
/// `offsets[u]..offsets[u+1]` indexes into `neighbors` to give the sorted
/// list of units adjacent to unit `u`.  Supports O(log deg) membership tests
/// via binary search.
///
/// The matrix is always symmetric and never contains self-loops; both are
/// enforced at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    /// CSR row offsets; length = `num_units + 1`.
    offsets: Vec<u32>,
    /// Flattened neighbor lists; sorted and deduplicated within each row.
    neighbors: Vec<UnitId>,
}

impl AdjacencyMatrix {
    /// A matrix over `num_units` isolated units.
    pub fn empty(num_units: usize) -> Self {
        Self { offsets: vec![0; num_units + 1], neighbors: Vec::new() }
    }

    /// Build a matrix from an arbitrary list of unordered pairs.
    ///
    /// Each pair is inserted in both directions; self-pairs and duplicates
    /// are dropped, so the result does not depend on pair order.
    pub fn from_pairs(num_units: usize, pairs: impl IntoIterator<Item = (UnitId, UnitId)>) -> Self {
        let mut rows: Vec<Vec<UnitId>> = vec![Vec::new(); num_units];
        for (a, b) in pairs {
            assert!(a.index() < num_units && b.index() < num_units,
                "pair ({a}, {b}) out of range for {num_units} units");
            if a == b { continue }
            rows[a.index()].push(b);
            rows[b.index()].push(a);
        }

        rows.iter_mut().for_each(|row| { row.sort_unstable(); row.dedup() });

        Self {
            offsets: std::iter::once(0u32).chain(
                rows.iter()
                    .map(|row| row.len() as u32)
                    .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
            ).collect(),
            neighbors: rows.into_iter().flatten().collect(),
        }
    }

    /// Number of units covered by this matrix.
    #[inline] pub fn num_units(&self) -> usize { self.offsets.len() - 1 }

    /// Number of undirected edges.
    #[inline] pub fn num_edges(&self) -> usize { self.neighbors.len() / 2 }

    #[inline]
    fn range(&self, unit: UnitId) -> std::ops::Range<usize> {
        self.offsets[unit.index()] as usize .. self.offsets[unit.index() + 1] as usize
    }

    /// Sorted slice of units adjacent to `unit`.
    #[inline]
    pub fn neighbors(&self, unit: UnitId) -> &[UnitId] {
        &self.neighbors[self.range(unit)]
    }

    /// Number of units adjacent to `unit`.
    #[inline] pub fn degree(&self, unit: UnitId) -> usize { self.range(unit).len() }

    /// Returns `true` if `other` is adjacent to `unit` (binary search).
    #[inline]
    pub fn contains(&self, unit: UnitId, other: UnitId) -> bool {
        self.neighbors(unit).binary_search(&other).is_ok()
    }

    /// Iterate over all valid unit ids.
    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        (0..self.num_units()).map(UnitId::from)
    }

    /// Iterate over each undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (UnitId, UnitId)> + '_ {
        self.units().flat_map(move |a| {
            self.neighbors(a).iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Units with no neighbors at all.
    pub fn islands(&self) -> Vec<UnitId> {
        self.units().filter(|&u| self.degree(u) == 0).collect()
    }

    /// Check the symmetry and no-self-loop invariants.
    pub fn is_symmetric(&self) -> bool {
        self.units().all(|a| {
            self.neighbors(a).iter().all(|&b| b != a && self.contains(b, a))
        })
    }
}
