//! Link-state sampler (C1, §4.1): per-edge cached LinkState with an epoch
//! counter so "resample everything" is O(1) instead of refilling a bitset.

use crate::graph::Graph;
use crate::prr::state::{sample_link_state, LinkState};
use rand::Rng;

pub struct LinkSampler {
    epoch: u64,
    stamp: Vec<u64>,
    cached: Vec<LinkState>,
}

impl LinkSampler {
    pub fn new(n_edges: usize) -> Self {
        Self {
            epoch: 0,
            stamp: vec![0; n_edges],
            cached: vec![LinkState::Blocked; n_edges],
        }
    }

    /// invalidates every cached sample in O(1)
    pub fn refresh(&mut self) {
        self.epoch += 1;
    }

    /// returns the cached state for this epoch, drawing a fresh sample if
    /// this edge hasn't been touched yet this epoch
    pub fn get<R: Rng + ?Sized>(&mut self, graph: &Graph, edge: u32, rng: &mut R) -> LinkState {
        let i = edge as usize;
        if self.stamp[i] == self.epoch {
            return self.cached[i];
        }
        let e = graph.edge(edge);
        let r: f64 = rng.random();
        let state = sample_link_state(r, e.p, e.pb);
        self.stamp[i] = self.epoch;
        self.cached[i] = state;
        state
    }

    /// returns the cached state assuming `get` was already called this
    /// epoch for this edge; panics (programming error) otherwise.
    pub fn fast_get(&self, edge: u32) -> LinkState {
        let i = edge as usize;
        debug_assert_eq!(self.stamp[i], self.epoch, "fast_get before get in this epoch");
        self.cached[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn single_edge(p: f64, pb: f64) -> Graph {
        Graph::build(2, vec![Edge { from: 0, to: 1, p, pb }])
    }

    #[test]
    fn sampling_law_matches_probabilities_within_tolerance() {
        let graph = single_edge(0.3, 0.6);
        let mut sampler = LinkSampler::new(1);
        let mut rng = rand::rng();
        let (mut active, mut boosted, mut blocked) = (0, 0, 0);
        let trials = 20_000;
        for _ in 0..trials {
            sampler.refresh();
            match sampler.get(&graph, 0, &mut rng) {
                LinkState::Active => active += 1,
                LinkState::Boosted => boosted += 1,
                LinkState::Blocked => blocked += 1,
            }
        }
        let tol = 0.02;
        assert!((active as f64 / trials as f64 - 0.3).abs() < tol);
        assert!((boosted as f64 / trials as f64 - 0.3).abs() < tol);
        assert!((blocked as f64 / trials as f64 - 0.4).abs() < tol);
    }

    #[test]
    fn cache_is_stable_within_one_epoch() {
        let graph = single_edge(0.5, 0.5);
        let mut sampler = LinkSampler::new(1);
        let mut rng = rand::rng();
        sampler.refresh();
        let first = sampler.get(&graph, 0, &mut rng);
        for _ in 0..10 {
            assert_eq!(sampler.get(&graph, 0, &mut rng), first);
            assert_eq!(sampler.fast_get(0), first);
        }
    }
}
