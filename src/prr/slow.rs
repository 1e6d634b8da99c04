//! Slow gain analyzer (C5, §4.5): for arbitrary priorities, re-simulate once
//! per boosted node instead of the two-BFS shortcut of the fast analyzer.

use std::collections::VecDeque;

use super::sketch::Sketch;
use super::state::{LinkState, NodeState, Priority};

/// boosts `v` in place, re-propagates, returns the resulting center state,
/// then restores `v`'s state/dist from the snapshot.
fn resimulate_boosting(sketch: &mut Sketch, v: usize, priority: &Priority) -> NodeState {
    let boosted_state = sketch.state[v].boosted();
    sketch.state[v] = boosted_state;

    let mut visited = vec![false; sketch.nodes().len().max(1)];
    let node_index: std::collections::HashMap<usize, usize> = sketch
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, i))
        .collect();
    visited[node_index[&v]] = true;

    let mut queue = VecDeque::from([v]);
    while let Some(cur) = queue.pop_front() {
        let cur_state = sketch.state[cur];
        let next_dist = sketch.dist[cur] + 1;
        for &e in sketch.out_of(cur) {
            let edge = *sketch.edge(e);
            let carries_boost = cur_state == NodeState::CaPlus;
            if !carries_boost && edge.state != LinkState::Active {
                continue;
            }
            let to = edge.to;
            let replaces = next_dist < sketch.dist[to]
                || (next_dist == sketch.dist[to] && priority.compare(cur_state, sketch.state[to]) == std::cmp::Ordering::Greater);
            if replaces {
                sketch.dist[to] = next_dist;
                sketch.state[to] = cur_state;
                let idx = node_index[&to];
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back(to);
                }
            }
        }
    }

    sketch.center_node_state()
}

/// computes `center_state_to` by snapshotting `(state, dist)`, boosting each
/// non-`None` node in turn, re-simulating, then restoring the snapshot.
pub fn calculate_center_state_to_slow(sketch: &mut Sketch, priority: &Priority) {
    let nodes: Vec<usize> = sketch.nodes().to_vec();
    let snapshot_state: Vec<NodeState> = nodes.iter().map(|&v| sketch.state[v]).collect();
    let snapshot_dist: Vec<u32> = nodes.iter().map(|&v| sketch.dist[v]).collect();

    for &v in &nodes {
        if sketch.state[v] == NodeState::None {
            sketch.center_state_to[v] = sketch.center_state;
            continue;
        }
        sketch.center_state_to[v] = resimulate_boosting(sketch, v, priority);
        for (i, &n) in nodes.iter().enumerate() {
            sketch.state[n] = snapshot_state[i];
            sketch.dist[n] = snapshot_dist[i];
        }
    }
}
