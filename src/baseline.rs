//! Baselines (A6, §4.14): max-degree and PageRank selection, for comparison
//! against the IMM-family algorithms.

use crate::graph::{Graph, SeedSet};
use crate::NodeId;

/// selects the `k` non-seed nodes ranked by a scoring function, seeds always
/// sorted last regardless of score.
fn rank_non_seeds(graph: &Graph, seeds: &SeedSet, k: usize, score: impl Fn(NodeId) -> f64) -> Vec<NodeId> {
    let mut indices: Vec<NodeId> = (0..graph.n()).collect();
    indices.sort_unstable_by(|&u, &v| {
        let (su, sv) = (seeds.contains(u), seeds.contains(v));
        if su != sv {
            return sv.cmp(&su);
        }
        if !su {
            return score(v).partial_cmp(&score(u)).unwrap();
        }
        u.cmp(&v)
    });
    let k = k.min(graph.n() - seeds.len());
    indices.truncate(k);
    indices
}

/// ranks non-seed nodes by total (in + out) degree, returns the top `k`.
pub fn max_degree_select(graph: &Graph, seeds: &SeedSet, k: usize) -> Vec<NodeId> {
    rank_non_seeds(graph, seeds, k, |v| {
        (graph.in_edges(v).len() + graph.out_edges(v).len()) as f64
    })
}

/// power-iteration PageRank, damping `alpha` in `(0, 1)`, until squared error
/// drops below `eps * eps` or `max_iterations` is hit.
pub fn page_rank(graph: &Graph, alpha: f64, eps: f64, max_iterations: usize) -> Vec<f64> {
    assert!(alpha > 0.0 && alpha < 1.0, "alpha must be in (0, 1)");
    let n = graph.n();
    let inv_n = 1.0 / n as f64;
    let c = (1.0 - alpha) * inv_n;

    let mut pr = vec![inv_n; n];
    for _ in 0..max_iterations {
        let mut next = vec![0.0; n];
        let mut dangling = 0.0;
        for u in 0..n {
            let out_edges = graph.out_edges(u);
            if out_edges.is_empty() {
                dangling += pr[u];
                continue;
            }
            let share = pr[u] / out_edges.len() as f64;
            for &e in out_edges {
                next[graph.edge(e).to] += share;
            }
        }
        for v in next.iter_mut() {
            *v = alpha * (*v + dangling * inv_n) + c;
        }

        let err: f64 = pr.iter().zip(&next).map(|(a, b)| (a - b).powi(2)).sum();
        pr = next;
        if err < eps * eps {
            break;
        }
    }
    pr
}

/// ranks non-seed nodes by PageRank score, returns the top `k`.
pub fn page_rank_select(graph: &Graph, seeds: &SeedSet, k: usize, alpha: f64, max_iterations: usize) -> Vec<NodeId> {
    let pr = page_rank(graph, alpha, 1e-6, max_iterations);
    rank_non_seeds(graph, seeds, k, |v| pr[v])
}
