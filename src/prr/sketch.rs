//! Reusable PRR-sketch scratch buffer (§3's "PRR-sketch" data model).
//!
//! Every field is sized `|V|`/`|E|` once and reused across samples via an
//! epoch stamp per node, mirroring the link sampler's epoch trick (§4.1) so
//! that sampling many sketches allocates nothing after warm-up.

use super::state::{LinkState, NodeState};
use crate::NodeId;

#[derive(Clone, Copy, Debug)]
pub struct SketchEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub state: LinkState,
}

pub struct Sketch {
    pub center: NodeId,
    pub center_state: NodeState,
    epoch: u64,
    touched: Vec<u64>,
    order: Vec<NodeId>,
    edges: Vec<SketchEdge>,
    out_adj: Vec<Vec<u32>>,
    in_adj: Vec<Vec<u32>>,
    pub dist: Vec<u32>,
    pub dist_r: Vec<u32>,
    pub max_dist_p: Vec<i64>,
    pub state: Vec<NodeState>,
    pub center_state_to: Vec<NodeState>,
}

pub const INF: u32 = u32::MAX;

impl Sketch {
    pub fn new(n: usize) -> Self {
        Self {
            center: 0,
            center_state: NodeState::None,
            epoch: 0,
            touched: vec![0; n],
            order: Vec::new(),
            edges: Vec::new(),
            out_adj: vec![Vec::new(); n],
            in_adj: vec![Vec::new(); n],
            dist: vec![0; n],
            dist_r: vec![0; n],
            max_dist_p: vec![0; n],
            state: vec![NodeState::None; n],
            center_state_to: vec![NodeState::None; n],
        }
    }

    /// clears the sketch and seeds it with `center` at `dist=0`
    pub fn begin(&mut self, center: NodeId) {
        self.epoch += 1;
        self.center = center;
        self.center_state = NodeState::None;
        self.order.clear();
        self.edges.clear();
        self.insert(center, 0);
    }

    /// inserts `v` with the given distance if not already present this
    /// epoch; returns whether it was newly inserted (first arrival wins).
    pub fn insert(&mut self, v: NodeId, dist: u32) -> bool {
        if self.touched[v] == self.epoch {
            return false;
        }
        self.touched[v] = self.epoch;
        self.order.push(v);
        self.dist[v] = dist;
        self.dist_r[v] = INF;
        self.max_dist_p[v] = i64::MAX;
        self.state[v] = NodeState::None;
        self.center_state_to[v] = NodeState::None;
        self.out_adj[v].clear();
        self.in_adj[v].clear();
        true
    }

    pub fn contains(&self, v: NodeId) -> bool {
        self.touched[v] == self.epoch
    }

    /// records a `from -> to` arc of the original graph, both endpoints
    /// already present in the sketch.
    pub fn push_edge(&mut self, from: NodeId, to: NodeId, state: LinkState) {
        let idx = self.edges.len() as u32;
        self.edges.push(SketchEdge { from, to, state });
        self.out_adj[from].push(idx);
        self.in_adj[to].push(idx);
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn edges(&self) -> &[SketchEdge] {
        &self.edges
    }

    pub fn edge(&self, idx: u32) -> &SketchEdge {
        &self.edges[idx as usize]
    }

    /// edges (indices) of arcs `v -> *` within the sketch
    pub fn out_of(&self, v: NodeId) -> &[u32] {
        &self.out_adj[v]
    }

    /// edges (indices) of arcs `* -> v` within the sketch
    pub fn in_of(&self, v: NodeId) -> &[u32] {
        &self.in_adj[v]
    }

    pub fn center_node_state(&self) -> NodeState {
        self.state[self.center]
    }
}
