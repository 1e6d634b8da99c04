//! Forward propagation simulator (C9, §4.9): scores a finished boosted set
//! by simulating on the full graph `T` times and diffing against an
//! empty-boost baseline.

use std::collections::VecDeque;

use rand::Rng;

use crate::graph::{Graph, SeedSet};
use crate::prr::state::{gain, LinkState, NodeState, Priority};
use crate::sampler::LinkSampler;
use crate::NodeId;

fn simulate_once<R: Rng + ?Sized>(
    graph: &Graph,
    sampler: &mut LinkSampler,
    seeds: &SeedSet,
    priority: &Priority,
    boosted: &[bool],
    rng: &mut R,
) -> Vec<NodeState> {
    sampler.refresh();
    let n = graph.n();
    let mut state = vec![NodeState::None; n];
    let mut dist = vec![u32::MAX; n];
    let mut queued = vec![false; n];
    let mut queue = VecDeque::new();

    let push_group = |state: &mut [NodeState], dist: &mut [u32], queued: &mut [bool], queue: &mut VecDeque<NodeId>, group: &[NodeId], s: NodeState| {
        for &v in group {
            state[v] = s;
            dist[v] = 0;
            queued[v] = true;
            queue.push_back(v);
        }
    };
    if priority.compare(NodeState::Ca, NodeState::Cr) == std::cmp::Ordering::Greater {
        push_group(&mut state, &mut dist, &mut queued, &mut queue, seeds.sa(), NodeState::Ca);
        push_group(&mut state, &mut dist, &mut queued, &mut queue, seeds.sr(), NodeState::Cr);
    } else {
        push_group(&mut state, &mut dist, &mut queued, &mut queue, seeds.sr(), NodeState::Cr);
        push_group(&mut state, &mut dist, &mut queued, &mut queue, seeds.sa(), NodeState::Ca);
    }

    while let Some(cur) = queue.pop_front() {
        if boosted[cur] {
            state[cur] = state[cur].boosted();
        }
        let cur_state = state[cur];
        let next_dist = dist[cur] + 1;
        for &e in graph.out_edges(cur) {
            let to = graph.edge(e).to;
            let link = sampler.get(graph, e, rng);
            let passes = if cur_state == NodeState::CaPlus {
                link != LinkState::Blocked
            } else {
                link == LinkState::Active
            };
            if !passes {
                continue;
            }
            let better = next_dist < dist[to]
                || (next_dist == dist[to] && priority.compare(cur_state, state[to]) == std::cmp::Ordering::Greater);
            if better {
                dist[to] = next_dist;
                state[to] = cur_state;
                if !queued[to] {
                    queued[to] = true;
                    queue.push_back(to);
                }
            }
        }
    }

    state
}

fn gains(states: &[NodeState], lambda: f64) -> (f64, f64, f64) {
    let mut positive = 0.0;
    let mut negative = 0.0;
    for &s in states {
        let g = gain(s, lambda);
        if g > 0.0 {
            positive += g;
        } else if g < 0.0 {
            negative += g;
        }
    }
    (positive, negative, positive + negative)
}

/// averages `(positive, negative, total)` gain over `t` independent
/// simulations on the full graph.
pub fn simulate_boosted<R: Rng + ?Sized>(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    boosted: &[bool],
    t: usize,
    rng: &mut R,
) -> (f64, f64, f64) {
    let mut sampler = LinkSampler::new(graph.n_edges());
    let (mut pos, mut neg, mut tot) = (0.0, 0.0, 0.0);
    for _ in 0..t {
        let states = simulate_once(graph, &mut sampler, seeds, priority, boosted, rng);
        let (p, n, g) = gains(&states, lambda);
        pos += p;
        neg += n;
        tot += g;
    }
    let t = t as f64;
    (pos / t, neg / t, tot / t)
}

/// scores a boosted set against an empty-set baseline, reporting the
/// difference in average `(positive, negative, total)` gain.
pub fn score_boosted<R: Rng + ?Sized>(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    boosted: &[NodeId],
    t: usize,
    rng: &mut R,
) -> (f64, f64, f64) {
    let mut mask = vec![false; graph.n()];
    for &v in boosted {
        mask[v] = true;
    }
    let with_boost = simulate_boosted(graph, seeds, priority, lambda, &mask, t, rng);
    let baseline = simulate_boosted(graph, seeds, priority, lambda, &vec![false; graph.n()], t, rng);
    (with_boost.0 - baseline.0, with_boost.1 - baseline.1, with_boost.2 - baseline.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use rand::SeedableRng;

    #[test]
    fn chain_with_certain_edges_yields_exact_gain() {
        // 0 -> 1 -> 2 -> 3 -> 4, all Active, Sa={0}, lambda=0.5
        let edges = (0..4).map(|i| Edge { from: i, to: i + 1, p: 1.0, pb: 1.0 }).collect();
        let graph = Graph::build(5, edges);
        let seeds = SeedSet::new(5, vec![0], vec![]);
        let priority = Priority::upper_bound();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
        let (pos, neg, tot) = simulate_boosted(&graph, &seeds, &priority, 0.5, &vec![false; 5], 3, &mut rng);
        assert!((pos - 2.5).abs() < 1e-9);
        assert_eq!(neg, 0.0);
        assert!((tot - 2.5).abs() < 1e-9);
    }

    #[test]
    fn boosting_the_seed_unblocks_a_zero_probability_chain() {
        // p=0, pb=1: edges are always Boosted-state, never Active, so an
        // unboosted Ca carrier never crosses one. Boosting the seed makes it
        // Ca+, which crosses Boosted edges and carries Ca+ down the chain.
        let edges = (0..4).map(|i| Edge { from: i, to: i + 1, p: 0.0, pb: 1.0 }).collect();
        let graph = Graph::build(5, edges);
        let seeds = SeedSet::new(5, vec![0], vec![]);
        let priority = Priority::upper_bound();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
        let mut mask = vec![false; 5];
        mask[0] = true;
        let (pos, _, _) = simulate_boosted(&graph, &seeds, &priority, 0.5, &mask, 1, &mut rng);
        assert!((pos - 2.5).abs() < 1e-9);
        let (pos_unboosted, _, _) = simulate_boosted(&graph, &seeds, &priority, 0.5, &vec![false; 5], 1, &mut rng);
        assert!((pos_unboosted - 0.5).abs() < 1e-9);
    }
}
