//! PR-IMM sketch collection (C6, §4.6): aggregates sketches for monotone and
//! submodular priorities, greedy `k`-selection with lazy delta updates.

use std::cmp::Ordering;

use crate::graph::SeedSet;
use crate::prr::state::{gain, NodeState, Priority};
use crate::prr::Sketch;
use crate::NodeId;

struct Entry {
    center_state: NodeState,
    items: Vec<(NodeId, NodeState)>,
}

pub struct PrImmCollection {
    n: usize,
    seeds: SeedSet,
    entries: Vec<Entry>,
    contrib: Vec<Vec<(usize, NodeState)>>,
    total_gain: Vec<f64>,
}

impl PrImmCollection {
    pub fn new(n: usize, seeds: SeedSet) -> Self {
        Self {
            n,
            seeds,
            entries: Vec::new(),
            contrib: vec![Vec::new(); n],
            total_gain: vec![0.0; n],
        }
    }

    pub fn n_sketches(&self) -> usize {
        self.entries.len()
    }

    /// walks every node of an already fast-analyzed sketch, drops
    /// non-positive deltas, records the rest.
    pub fn add(&mut self, sketch: &Sketch, lambda: f64) {
        let center_state = sketch.center_state;
        let mut items = Vec::new();
        for &v in sketch.nodes() {
            let delta = gain(sketch.center_state_to[v], lambda) - gain(center_state, lambda);
            if delta <= 0.0 {
                continue;
            }
            items.push((v, sketch.center_state_to[v]));
        }
        if items.is_empty() {
            return;
        }
        let entry_idx = self.entries.len();
        for &(v, cst) in &items {
            self.contrib[v].push((entry_idx, cst));
            self.total_gain[v] += gain(cst, lambda) - gain(center_state, lambda);
        }
        self.entries.push(Entry { center_state, items });
    }

    /// appends another collection's entries with indices shifted by an
    /// offset so cross-referencing contrib indices stay valid.
    pub fn merge(&mut self, other: PrImmCollection) {
        let offset = self.entries.len();
        self.entries.extend(other.entries);
        for v in 0..self.n {
            for &(idx, cst) in &other.contrib[v] {
                self.contrib[v].push((idx + offset, cst));
            }
            self.total_gain[v] += other.total_gain[v];
        }
    }

    /// greedy `k`-selection with lazy delta updates; returns the total
    /// marginal (summed over all stored sketches, not yet divided by |R|)
    /// and the selected nodes in pick order.
    pub fn select(&self, k: usize, priority: &Priority, lambda: f64) -> (f64, Vec<NodeId>) {
        let mut total_gain = self.total_gain.clone();
        let mut center_state = self.entries.iter().map(|e| e.center_state).collect::<Vec<_>>();
        for &a in self.seeds.sa() {
            total_gain[a] = f64::NEG_INFINITY;
        }
        for &r in self.seeds.sr() {
            total_gain[r] = f64::NEG_INFINITY;
        }

        let mut res = 0.0;
        let mut picked = Vec::with_capacity(k);
        for _ in 0..k.min(self.n) {
            let v = argmax(&total_gain);
            if total_gain[v] == f64::NEG_INFINITY {
                break;
            }
            picked.push(v);
            res += total_gain[v];
            total_gain[v] = f64::NEG_INFINITY;

            for &(entry_idx, cst) in &self.contrib[v] {
                if priority.compare(cst, center_state[entry_idx]) != Ordering::Greater {
                    continue;
                }
                let delta = gain(cst, lambda) - gain(center_state[entry_idx], lambda);
                for &(j, _) in &self.entries[entry_idx].items {
                    total_gain[j] -= delta;
                }
                center_state[entry_idx] = cst;
            }
        }
        (res, picked)
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..values.len() {
        if values[i] > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph};
    use crate::prr::builder::sample_prr_sketch;
    use crate::prr::fast::calculate_center_state_to_fast;
    use crate::prr::simulate::simulate_no_boost;
    use crate::sampler::LinkSampler;
    use rand::SeedableRng;

    #[test]
    fn boosting_the_only_candidate_is_selected() {
        let graph = Graph::build(2, vec![Edge { from: 0, to: 1, p: 1.0, pb: 1.0 }]);
        let seeds = SeedSet::new(2, vec![], vec![0]);
        let priority = Priority::upper_bound();
        let mut sampler = LinkSampler::new(graph.n_edges());
        let mut sketch = Sketch::new(graph.n());
        let mut rng = rand::rngs::SmallRng::seed_from_u64(11);
        let mut collection = PrImmCollection::new(graph.n(), seeds.clone());

        for _ in 0..50 {
            sample_prr_sketch(&graph, &mut sampler, &seeds, 1, &mut sketch, &mut rng);
            simulate_no_boost(&mut sketch, &seeds, &priority);
            calculate_center_state_to_fast(&mut sketch, &priority);
            collection.add(&sketch, 0.5);
        }

        let (gain_total, picked) = collection.select(1, &priority, 0.5);
        assert_eq!(picked, vec![0]);
        assert!(gain_total > 0.0);
    }

    #[test]
    fn merge_matches_combined_add() {
        let graph = Graph::build(2, vec![Edge { from: 0, to: 1, p: 1.0, pb: 1.0 }]);
        let seeds = SeedSet::new(2, vec![], vec![0]);
        let priority = Priority::upper_bound();
        let mut sampler = LinkSampler::new(graph.n_edges());
        let mut sketch = Sketch::new(graph.n());
        let mut rng = rand::rngs::SmallRng::seed_from_u64(5);

        let mut whole = PrImmCollection::new(graph.n(), seeds.clone());
        let mut half_a = PrImmCollection::new(graph.n(), seeds.clone());
        let mut half_b = PrImmCollection::new(graph.n(), seeds.clone());
        for i in 0..20 {
            sample_prr_sketch(&graph, &mut sampler, &seeds, 1, &mut sketch, &mut rng);
            simulate_no_boost(&mut sketch, &seeds, &priority);
            calculate_center_state_to_fast(&mut sketch, &priority);
            whole.add(&sketch, 0.5);
            if i < 10 {
                half_a.add(&sketch, 0.5);
            } else {
                half_b.add(&sketch, 0.5);
            }
        }
        half_a.merge(half_b);
        assert_eq!(whole.total_gain, half_a.total_gain);
    }
}
