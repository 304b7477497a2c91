//! Node accounting for one search.

/// Counters reset at every completed iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Statistics {
    pub nodes: u64,
    pub qnodes: u64,
    pub leafs: u64,
    pub qleafs: u64,
    pub beta_cutoffs: u64,
    pub qbeta_cutoffs: u64,
    pub tt_hits: u64,
}

impl Statistics {
    #[must_use]
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.qnodes
    }

    pub fn reset(&mut self) {
        *self = Statistics::default();
    }
}
