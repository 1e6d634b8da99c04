//! Adaptive sampler loop (C8, §4.8): IMM doubling schedule with a
//! lower-bound test, and the fixed-schedule (static) variants.

use std::collections::VecDeque;
use std::time::Instant;

use crate::graph::{Graph, SeedSet};
use crate::prr::state::Priority;
use crate::workers::Pool;
use crate::NodeId;
use crate::TRAINING_LOG_INTERVAL;

const DELTA: f64 = 1.0 - std::f64::consts::E.recip();

struct ImmParams {
    alpha: f64,
    beta: f64,
    theta0: f64,
    log2n: f64,
}

fn ln_choose(n: usize, k: usize) -> f64 {
    let mut acc = 0.0;
    for x in (n - k + 1)..=n {
        acc += (x as f64).ln();
    }
    for x in 1..=k {
        acc -= (x as f64).ln();
    }
    acc
}

/// `ell' = ell * (1 + ln2/ln n)`, a tightening substitution applied once
/// before deriving the rest of the IMM parameters.
pub fn tighten_ell(ell: f64, n: usize) -> f64 {
    ell * (1.0 + std::f64::consts::LN_2 / (n as f64).ln())
}

fn derive_params(n: usize, k: usize, ell: f64, epsilon: f64) -> ImmParams {
    let log2n = (n as f64).log2();
    let ln_n = (n as f64).ln();
    let ln_cnk = ln_choose(n, k);
    let alpha = DELTA * (ell * ln_n + std::f64::consts::LN_2).sqrt();
    let beta = (DELTA * (ell * ln_n + ln_cnk + std::f64::consts::LN_2)).sqrt();
    let theta0 = (1.0 + std::f64::consts::SQRT_2 * epsilon / 3.0) * (ln_cnk + ell * ln_n + log2n.ln())
        / epsilon.powi(2);
    ImmParams { alpha, beta, theta0, log2n }
}

pub struct ImmOutcome {
    pub total_gain: f64,
    pub boosted: Vec<NodeId>,
    pub n_samples: u64,
}

/// dynamic PR-IMM: doubles the sample size until the martingale
/// lower-bound test passes or the sample limit is reached, then samples to
/// the derived final theta.
pub fn pr_imm_dynamic(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    k: usize,
    ell: f64,
    epsilon: f64,
    sample_limit: u64,
    pool: &Pool,
) -> ImmOutcome {
    let ell = tighten_ell(ell, graph.n());
    let params = derive_params(graph.n(), k, ell, epsilon);

    let mut collection = crate::imm::collection_pr::PrImmCollection::new(graph.n(), seeds.clone());
    let mut n_samples = 0u64;
    let mut theta = params.theta0;
    let mut min_s = 1.0 + std::f64::consts::SQRT_2 * epsilon;
    let mut lb = 1.0;

    let max_iter = (params.log2n.floor() as i64 - 1).max(1);
    let mut last_log: Option<Instant> = None;
    for i in 1..=max_iter {
        theta *= 2.0;
        min_s /= 2.0;

        let target = (theta.min(sample_limit as f64)) as u64;
        if target > n_samples {
            let extra = target - n_samples;
            collection.merge(pool.sample_fast(extra, graph, seeds, priority, lambda));
            n_samples += extra;
        }
        if n_samples >= sample_limit {
            log::warn!("sample limit {sample_limit} reached at PR-IMM iteration {i}");
            break;
        }

        let (gain_sum, _) = collection.select(k, priority, lambda);
        let s = gain_sum / n_samples as f64;
        if last_log.is_none_or(|t| t.elapsed() >= TRAINING_LOG_INTERVAL) {
            log::info!("PR-IMM iteration {i}: theta={theta:.0}, samples={n_samples}, S={s:.6}, required={min_s:.6}");
            last_log = Some(Instant::now());
        }
        if s >= min_s {
            lb = s * graph.n() as f64 / (1.0 + std::f64::consts::SQRT_2 * epsilon);
            break;
        }
    }

    let final_theta = 2.0 * graph.n() as f64 * (params.alpha + params.beta).powi(2) / lb / epsilon.powi(2);
    let target = (final_theta.min(sample_limit as f64)) as u64;
    if target > n_samples {
        let extra = target - n_samples;
        collection.merge(pool.sample_fast(extra, graph, seeds, priority, lambda));
        n_samples += extra;
    }
    log::info!("PR-IMM: final theta={final_theta:.0}, samples={n_samples}");

    let (gain_sum, boosted) = collection.select(k, priority, lambda);
    let total_gain = gain_sum / n_samples as f64 * graph.n() as f64;
    ImmOutcome { total_gain, boosted, n_samples }
}

/// static PR-IMM: tops up to each sample count of a user schedule and
/// reports a result row at every step.
pub fn pr_imm_static(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    k: usize,
    schedule: &[u64],
    pool: &Pool,
) -> Vec<ImmOutcome> {
    let mut collection = crate::imm::collection_pr::PrImmCollection::new(graph.n(), seeds.clone());
    let mut n_samples = 0u64;
    let mut rows = Vec::with_capacity(schedule.len());
    for &target in schedule {
        if target > n_samples {
            let extra = target - n_samples;
            collection.merge(pool.sample_fast(extra, graph, seeds, priority, lambda));
            n_samples = target;
        }
        let (gain_sum, boosted) = collection.select(k, priority, lambda);
        let total_gain = gain_sum / n_samples as f64 * graph.n() as f64;
        log::info!("PR-IMM static: {n_samples} samples, total_gain={total_gain:.3}");
        rows.push(ImmOutcome { total_gain, boosted, n_samples });
    }
    rows
}

/// nodes whose shortest unweighted forward distance from any seed is within
/// `dist_limit` (excludes the seeds themselves); `dist_limit >= n` picks
/// every node.
pub fn center_candidates(graph: &Graph, seeds: &SeedSet, dist_limit: usize) -> Vec<NodeId> {
    if dist_limit >= graph.n() {
        return (0..graph.n()).collect();
    }
    let mut dist = vec![usize::MAX; graph.n()];
    let mut queue = VecDeque::new();
    for &s in seeds.sa().iter().chain(seeds.sr()) {
        dist[s] = 0;
        queue.push_back(s);
    }
    let mut candidates = Vec::new();
    while let Some(cur) = queue.pop_front() {
        for &e in graph.out_edges(cur) {
            let to = graph.edge(e).to;
            if dist[to] == usize::MAX {
                dist[to] = dist[cur] + 1;
                if dist[to] <= dist_limit {
                    queue.push_back(to);
                    candidates.push(to);
                }
            }
        }
    }
    candidates
}

/// dynamic SA-IMM / SA-RG-IMM: same martingale derivation as PR-IMM, but
/// theta is samples-per-candidate-center (see DESIGN.md for why this
/// resolves the per-center-vs-global ambiguity the source leaves open) and
/// selection runs against the non-submodular surrogate.
#[allow(clippy::too_many_arguments)]
pub fn sa_imm_dynamic(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    k: usize,
    threshold: f64,
    dist_limit: usize,
    ell: f64,
    epsilon: f64,
    sample_limit: u64,
    random_greedy: bool,
    pool: &Pool,
) -> ImmOutcome {
    let ell = tighten_ell(ell, graph.n());
    let params = derive_params(graph.n(), k, ell, epsilon);
    let centers = center_candidates(graph, seeds, dist_limit);
    log::info!(
        "SA-IMM: {} candidate centers of {} ({:.2}%)",
        centers.len(),
        graph.n(),
        100.0 * centers.len() as f64 / graph.n() as f64
    );

    let mut collection = crate::imm::collection_sa::SaImmCollection::new(graph.n(), threshold, seeds.clone());
    let mut samples_per_center = 0u64;
    let mut theta = params.theta0;
    let mut min_s = 1.0 + std::f64::consts::SQRT_2 * epsilon;
    let mut lb = 1.0;

    let max_iter = (params.log2n.floor() as i64 - 1).max(1);
    let mut last_log: Option<Instant> = None;
    for i in 1..=max_iter {
        theta *= 2.0;
        min_s /= 2.0;

        let target = (theta.min(sample_limit as f64)) as u64;
        if target > samples_per_center {
            let extra = target - samples_per_center;
            collection.merge(pool.sample_sa(&centers, extra, graph, seeds, priority, lambda, threshold));
            samples_per_center += extra;
        }
        if samples_per_center >= sample_limit {
            log::warn!("sample limit {sample_limit} reached at SA-IMM iteration {i}");
            break;
        }

        let (s, _) = select_sa(&collection, k, random_greedy);
        if last_log.is_none_or(|t| t.elapsed() >= TRAINING_LOG_INTERVAL) {
            log::info!("SA-IMM iteration {i}: theta={theta:.0}, samples/center={samples_per_center}, S={s:.6}, required={min_s:.6}");
            last_log = Some(Instant::now());
        }
        if s >= min_s {
            lb = s;
            break;
        }
    }

    let final_theta = 2.0 * graph.n() as f64 * (params.alpha + params.beta).powi(2) / lb / epsilon.powi(2);
    let target = (final_theta.min(sample_limit as f64)) as u64;
    if target > samples_per_center {
        let extra = target - samples_per_center;
        collection.merge(pool.sample_sa(&centers, extra, graph, seeds, priority, lambda, threshold));
        samples_per_center += extra;
    }

    let (total_gain, boosted) = select_sa(&collection, k, random_greedy);
    ImmOutcome { total_gain, boosted, n_samples: samples_per_center }
}

/// fixed-schedule SA-IMM / SA-RG-IMM variant, one row per schedule entry.
#[allow(clippy::too_many_arguments)]
pub fn sa_imm_static(
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    lambda: f64,
    k: usize,
    threshold: f64,
    dist_limit: usize,
    schedule: &[u64],
    random_greedy: bool,
    pool: &Pool,
) -> Vec<ImmOutcome> {
    let centers = center_candidates(graph, seeds, dist_limit);
    let mut collection = crate::imm::collection_sa::SaImmCollection::new(graph.n(), threshold, seeds.clone());
    let mut samples_per_center = 0u64;
    let mut rows = Vec::with_capacity(schedule.len());
    for &target in schedule {
        if target > samples_per_center {
            let extra = target - samples_per_center;
            collection.merge(pool.sample_sa(&centers, extra, graph, seeds, priority, lambda, threshold));
            samples_per_center = target;
        }
        let (total_gain, boosted) = select_sa(&collection, k, random_greedy);
        log::info!("SA-IMM static: {samples_per_center} samples/center, total_gain={total_gain:.3}");
        rows.push(ImmOutcome { total_gain, boosted, n_samples: samples_per_center });
    }
    rows
}

fn select_sa(
    collection: &crate::imm::collection_sa::SaImmCollection,
    k: usize,
    random_greedy: bool,
) -> (f64, Vec<NodeId>) {
    if random_greedy {
        collection.random_select(k, &mut rand::rng())
    } else {
        collection.select(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    #[test]
    fn center_candidates_respects_distance_limit() {
        let edges = (0..4).map(|i| Edge { from: i, to: i + 1, p: 1.0, pb: 1.0 }).collect();
        let graph = Graph::build(5, edges);
        let seeds = SeedSet::new(5, vec![0], vec![]);
        let near = center_candidates(&graph, &seeds, 2);
        assert_eq!(near, vec![1, 2]);
    }

    #[test]
    fn pr_imm_dynamic_terminates_and_picks_the_boostable_leaf() {
        let edges = (0..99).map(|i| Edge { from: 0, to: i + 1, p: 0.5, pb: 1.0 }).collect();
        let graph = Graph::build(100, edges);
        let seeds = SeedSet::new(100, vec![0], vec![]);
        let priority = Priority::upper_bound();
        let pool = Pool::new(2);
        let outcome = pr_imm_dynamic(&graph, &seeds, &priority, 0.5, 5, 1.0, 0.3, 20_000, &pool);
        assert!(outcome.n_samples <= 20_000);
        assert!(!outcome.boosted.contains(&0));
    }
}
