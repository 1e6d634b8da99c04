//! Forward simulator on a sketch (C3, §4.3): priority-ordered multi-source
//! BFS over Active edges only, assigning each node its baseline state.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::sketch::{Sketch, INF};
use super::state::{LinkState, NodeState, Priority};
use crate::graph::SeedSet;

/// resets the sketch to `state=None, dist=+inf` everywhere, then runs the
/// multi-source BFS. Returns the resulting center state.
pub fn simulate_no_boost(sketch: &mut Sketch, seeds: &SeedSet, priority: &Priority) -> NodeState {
    for &v in sketch.nodes() {
        sketch.state[v] = NodeState::None;
        sketch.dist[v] = INF;
    }

    let mut queue = VecDeque::new();
    let push_group = |sketch: &mut Sketch, queue: &mut VecDeque<usize>, group: &[usize], state: NodeState| {
        for &s in group {
            if sketch.contains(s) {
                sketch.dist[s] = 0;
                sketch.state[s] = state;
                queue.push_back(s);
            }
        }
    };

    if priority.compare(NodeState::Ca, NodeState::Cr) == Ordering::Greater {
        push_group(sketch, &mut queue, seeds.sa(), NodeState::Ca);
        push_group(sketch, &mut queue, seeds.sr(), NodeState::Cr);
    } else {
        push_group(sketch, &mut queue, seeds.sr(), NodeState::Cr);
        push_group(sketch, &mut queue, seeds.sa(), NodeState::Ca);
    }

    while let Some(cur) = queue.pop_front() {
        let next_dist = sketch.dist[cur] + 1;
        let cur_state = sketch.state[cur];
        for &e in sketch.out_of(cur) {
            let edge = *sketch.edge(e);
            if edge.state != LinkState::Active {
                continue;
            }
            let to = edge.to;
            if sketch.dist[to] == INF {
                sketch.dist[to] = next_dist;
                sketch.state[to] = cur_state;
                queue.push_back(to);
            }
        }
    }

    sketch.center_state = sketch.center_node_state();
    sketch.center_state
}
