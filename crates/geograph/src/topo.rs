use std::collections::VecDeque;

use crate::adj::AdjacencyMatrix;
use crate::unit::UnitId;

impl AdjacencyMatrix {
    /// Component label for every unit; components are numbered in order of
    /// their smallest unit.
    pub fn component_labels(&self) -> Vec<u32> {
        let mut labels = vec![u32::MAX; self.num_units()];
        let mut next = 0u32;

        for start in self.units() {
            if labels[start.index()] != u32::MAX { continue }

            labels[start.index()] = next;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for &v in self.neighbors(u) {
                    if labels[v.index()] == u32::MAX {
                        labels[v.index()] = next;
                        queue.push_back(v);
                    }
                }
            }
            next += 1;
        }

        labels
    }

    /// Number of maximal connected components.
    pub fn num_components(&self) -> usize {
        self.component_labels().iter()
            .max()
            .map_or(0, |&max| max as usize + 1)
    }

    /// Partition all units into maximal connected components.
    pub fn connected_components(&self) -> Vec<Vec<UnitId>> {
        let labels = self.component_labels();
        let mut components = vec![Vec::new(); self.num_components()];
        for unit in self.units() {
            components[labels[unit.index()] as usize].push(unit);
        }
        components
    }

    /// Returns `true` if all units in `units` form a single connected
    /// component when restricted to edges inside the subset.
    ///
    /// The empty set is considered contiguous.
    pub fn is_connected_subset(&self, units: impl IntoIterator<Item = UnitId>) -> bool {
        // Deduplicate and validate indices.
        let mut subset = Vec::new();
        let mut in_subset = vec![false; self.num_units()];
        for u in units {
            assert!(u.index() < self.num_units(), "{u} out of range");
            if !in_subset[u.index()] { in_subset[u.index()] = true; subset.push(u) }
        }
        if subset.is_empty() { return true }

        let mut seen = 1usize;
        let mut visited = vec![false; self.num_units()];
        let mut queue = VecDeque::from([subset[0]]);
        visited[subset[0].index()] = true;
        while let Some(u) = queue.pop_front() {
            for &v in self.neighbors(u) {
                if in_subset[v.index()] && !visited[v.index()] {
                    seen += 1;
                    visited[v.index()] = true;
                    queue.push_back(v);
                }
            }
        }

        seen == subset.len()
    }
}
