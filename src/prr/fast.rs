//! Fast gain analyzer (C4, §4.4): for monotone+submodular priorities, the
//! would-be center state under each single-node boost, in two BFS passes
//! instead of one re-simulation per node.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::sketch::{Sketch, INF};
use super::state::{LinkState, NodeState, Priority};

fn calculate_center_state_to_fast_r(sketch: &mut Sketch) {
    for &v in sketch.nodes() {
        sketch.dist_r[v] = INF;
    }
    let center = sketch.center;
    sketch.dist_r[center] = 0;
    let mut queue = VecDeque::from([center]);
    while let Some(cur) = queue.pop_front() {
        let next = sketch.dist_r[cur] + 1;
        for &e in sketch.in_of(cur) {
            let edge = *sketch.edge(e);
            if edge.state == LinkState::Active && sketch.dist_r[edge.from] == INF {
                sketch.dist_r[edge.from] = next;
                queue.push_back(edge.from);
            }
        }
    }
    let center_dist = sketch.dist[center];
    for &v in sketch.nodes() {
        if sketch.state[v] == NodeState::Cr && sketch.dist[v] + sketch.dist_r[v] <= center_dist {
            sketch.center_state_to[v] = NodeState::CrMinus;
        }
    }
}

/// computes `center_state_to` for every node of an already-simulated sketch.
pub fn calculate_center_state_to_fast(sketch: &mut Sketch, priority: &Priority) {
    let center = sketch.center;
    let center_state = sketch.center_state;
    for &v in sketch.nodes() {
        sketch.center_state_to[v] = center_state;
    }
    if center_state == NodeState::Ca {
        return;
    }
    if center_state == NodeState::Cr {
        calculate_center_state_to_fast_r(sketch);
    }

    let cr_higher = priority.compare(NodeState::Cr, NodeState::CaPlus) == Ordering::Greater;

    for &v in sketch.nodes() {
        sketch.max_dist_p[v] = i64::MAX;
    }
    let penalty = |state: NodeState| if cr_higher && state == NodeState::Cr { 1 } else { 0 };

    let mut heap = BinaryHeap::new();
    sketch.max_dist_p[center] = sketch.dist[center] as i64 - penalty(center_state);
    heap.push((sketch.max_dist_p[center], center));

    while let Some((value, cur)) = heap.pop() {
        if value != sketch.max_dist_p[cur] {
            continue;
        }
        for &e in sketch.in_of(cur) {
            let edge = *sketch.edge(e);
            let from = edge.from;
            if sketch.max_dist_p[from] == i64::MAX {
                let via_cur = sketch.max_dist_p[cur] - 1;
                let own_bound = sketch.dist[from] as i64 - penalty(sketch.state[from]);
                sketch.max_dist_p[from] = via_cur.min(own_bound);
                heap.push((sketch.max_dist_p[from], from));
            }
        }
    }

    for &v in sketch.nodes() {
        if sketch.state[v] == NodeState::Ca && sketch.max_dist_p[v] >= sketch.dist[v] as i64 {
            sketch.center_state_to[v] = NodeState::CaPlus;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph, SeedSet};
    use crate::prr::builder::sample_prr_sketch;
    use crate::prr::simulate::simulate_no_boost;
    use crate::sampler::LinkSampler;
    use rand::SeedableRng;

    #[test]
    fn boosting_seed_flips_cr_center_to_cr_minus() {
        // Cr seed 0 -> center 1, active link only (p=pb=1 so always active)
        let graph = Graph::build(2, vec![Edge { from: 0, to: 1, p: 1.0, pb: 1.0 }]);
        let seeds = SeedSet::new(2, vec![], vec![0]);
        let mut sampler = LinkSampler::new(graph.n_edges());
        let mut sketch = Sketch::new(graph.n());
        let mut rng = rand::rngs::SmallRng::seed_from_u64(3);
        sample_prr_sketch(&graph, &mut sampler, &seeds, 1, &mut sketch, &mut rng);
        let priority = Priority::upper_bound();
        simulate_no_boost(&mut sketch, &seeds, &priority);
        assert_eq!(sketch.center_state, NodeState::Cr);
        calculate_center_state_to_fast(&mut sketch, &priority);
        assert_eq!(sketch.center_state_to[0], NodeState::CrMinus);
    }

    #[test]
    fn ca_center_is_never_improved() {
        let graph = Graph::build(2, vec![Edge { from: 0, to: 1, p: 1.0, pb: 1.0 }]);
        let seeds = SeedSet::new(2, vec![0], vec![]);
        let mut sampler = LinkSampler::new(graph.n_edges());
        let mut sketch = Sketch::new(graph.n());
        let mut rng = rand::rngs::SmallRng::seed_from_u64(3);
        sample_prr_sketch(&graph, &mut sampler, &seeds, 1, &mut sketch, &mut rng);
        let priority = Priority::upper_bound();
        simulate_no_boost(&mut sketch, &seeds, &priority);
        assert_eq!(sketch.center_state, NodeState::Ca);
        calculate_center_state_to_fast(&mut sketch, &priority);
        for &v in sketch.nodes() {
            assert_eq!(sketch.center_state_to[v], NodeState::Ca);
        }
    }
}
