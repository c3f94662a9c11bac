//! Flattened lattice of candidate boundary positions.

use crate::bounds::Bounds;

/// Three parallel rows indexed by node id.
///
/// Node ids `table_index[b]..table_index[b + 1]` hold boundary `b`'s candidate
/// positions in increasing order. `score` is the best cumulative correlation of
/// any path reaching the node (`-inf` while unreachable) and `predecessor`
/// names the node the best path came from.
#[derive(Debug, Clone)]
pub struct WarpingTable {
    position: Vec<i64>,
    score: Vec<f64>,
    predecessor: Vec<Option<usize>>,
    table_index: Vec<usize>,
}

impl WarpingTable {
    /// Lay out one node per feasible position of every boundary.
    ///
    /// The origin boundary's nodes start with score 0; every other node is unreachable.
    #[must_use]
    pub fn new(bounds: &Bounds) -> Self {
        let table_index = bounds.table_index();
        let size = table_index[table_index.len() - 1];

        let mut position = Vec::with_capacity(size);
        for b in 0..bounds.len() {
            position.extend(bounds.lower(b)..=bounds.upper(b));
        }
        debug_assert_eq!(position.len(), size);

        let mut score = vec![f64::NEG_INFINITY; size];
        for s in &mut score[table_index[0]..table_index[1]] {
            *s = 0.0;
        }

        Self {
            position,
            score,
            predecessor: vec![None; size],
            table_index,
        }
    }

    /// Return the total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Return true if the table has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Return the node-id range belonging to boundary `b`.
    #[must_use]
    pub fn nodes(&self, b: usize) -> std::ops::Range<usize> {
        self.table_index[b]..self.table_index[b + 1]
    }

    /// Return the node id of the terminal boundary's last position.
    #[must_use]
    pub fn terminal(&self) -> usize {
        self.len() - 1
    }

    /// Return the candidate position of `node`.
    #[must_use]
    pub fn position(&self, node: usize) -> i64 {
        self.position[node]
    }

    /// Return the best cumulative score at `node`.
    #[must_use]
    pub fn score(&self, node: usize) -> f64 {
        self.score[node]
    }

    /// Return the best predecessor of `node`, if it is reachable.
    #[must_use]
    pub fn predecessor(&self, node: usize) -> Option<usize> {
        self.predecessor[node]
    }

    /// Return true if some path from the origin reaches `node`.
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.score[node] > f64::NEG_INFINITY
    }

    /// Node id of `position` within boundary `b`, given the boundary's lower bound.
    pub(crate) fn node_of(&self, b: usize, lower: i64, position: i64) -> usize {
        self.table_index[b] + (position - lower) as usize
    }

    pub(crate) fn set(&mut self, node: usize, score: f64, predecessor: usize) {
        self.score[node] = score;
        self.predecessor[node] = Some(predecessor);
    }
}
