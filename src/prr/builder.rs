//! PRR-sketch builder (C2, §4.2): reverse BFS from a center, bounded by
//! distance to the nearest seed.

use std::collections::VecDeque;

use rand::Rng;

use super::sketch::Sketch;
use crate::graph::{Graph, SeedSet};
use crate::prr::state::LinkState;
use crate::sampler::LinkSampler;
use crate::NodeId;

/// distance-to-seed probe: Active-only reverse BFS from `center`, returning
/// the distance to the nearest seed, or `graph.n()` if none is reachable.
fn limit_dist<R: Rng + ?Sized>(
    graph: &Graph,
    sampler: &mut LinkSampler,
    seeds: &SeedSet,
    center: NodeId,
    sketch: &mut Sketch,
    rng: &mut R,
) -> u32 {
    sketch.begin(center);
    if seeds.contains(center) {
        return 0;
    }
    let mut queue = VecDeque::from([center]);
    while let Some(cur) = queue.pop_front() {
        let next_dist = sketch.dist[cur] + 1;
        for &e in graph.in_edges(cur) {
            let edge = graph.edge(e);
            let from = edge.from;
            if sampler.get(graph, e, rng) != LinkState::Active || sketch.contains(from) {
                continue;
            }
            sketch.insert(from, next_dist);
            if seeds.contains(from) {
                return next_dist;
            }
            queue.push_back(from);
        }
    }
    graph.n() as u32
}

/// samples one PRR-sketch rooted at `center` into `sketch`, ready for
/// forward simulation (C3).
pub fn sample_prr_sketch<R: Rng + ?Sized>(
    graph: &Graph,
    sampler: &mut LinkSampler,
    seeds: &SeedSet,
    center: NodeId,
    sketch: &mut Sketch,
    rng: &mut R,
) {
    sampler.refresh();
    let limit = limit_dist(graph, sampler, seeds, center, sketch, rng);

    sketch.begin(center);
    let mut queue = VecDeque::from([center]);
    while let Some(cur) = queue.pop_front() {
        let next_dist = sketch.dist[cur] + 1;
        for &e in graph.in_edges(cur) {
            let edge = graph.edge(e);
            let from = edge.from;
            let state = sampler.get(graph, e, rng);
            if state == LinkState::Blocked {
                continue;
            }
            if !sketch.contains(from) {
                sketch.insert(from, next_dist);
                if next_dist < limit {
                    queue.push_back(from);
                }
            }
            sketch.push_edge(from, cur, state);
        }
    }
}
