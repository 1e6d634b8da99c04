//! Worker pool (A5, §4.13): thread-parallel sketch generation, each worker
//! owning its own link sampler, scratch sketch and PRNG.

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::graph::{Graph, SeedSet};
use crate::imm::collection_pr::PrImmCollection;
use crate::imm::collection_sa::SaImmCollection;
use crate::prr::builder::sample_prr_sketch;
use crate::prr::fast::calculate_center_state_to_fast;
use crate::prr::simulate::simulate_no_boost;
use crate::prr::slow::calculate_center_state_to_slow;
use crate::prr::state::{gain, Priority};
use crate::prr::Sketch;
use crate::sampler::LinkSampler;
use crate::NodeId;

pub struct Pool {
    workers: usize,
}

fn seeded_rng() -> rand::rngs::SmallRng {
    rand::rngs::SmallRng::seed_from_u64(rand::rng().random())
}

/// splits `total` items across `workers` as evenly as possible.
fn split(total: u64, workers: usize) -> Vec<u64> {
    (0..workers)
        .map(|w| {
            let first = total * w as u64 / workers as u64;
            let last = total * (w as u64 + 1) / workers as u64;
            last - first
        })
        .collect()
}

impl Pool {
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1) }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// draws `n` PRR-sketches with uniformly random centers, fast-analyzes
    /// each, and merges every worker's independent collection serially.
    pub fn sample_fast(
        &self,
        n: u64,
        graph: &Graph,
        seeds: &SeedSet,
        priority: &Priority,
        lambda: f64,
    ) -> PrImmCollection {
        let shares = split(n, self.workers);
        let bar = crate::progress(n as usize);
        let partials: Vec<PrImmCollection> = shares
            .into_par_iter()
            .map(|share| {
                let mut sampler = LinkSampler::new(graph.n_edges());
                let mut sketch = Sketch::new(graph.n());
                let mut rng = seeded_rng();
                let mut collection = PrImmCollection::new(graph.n(), seeds.clone());
                for _ in 0..share {
                    let center: NodeId = rng.random_range(0..graph.n());
                    sample_prr_sketch(graph, &mut sampler, seeds, center, &mut sketch, &mut rng);
                    simulate_no_boost(&mut sketch, seeds, priority);
                    calculate_center_state_to_fast(&mut sketch, priority);
                    collection.add(&sketch, lambda);
                    bar.inc(1);
                }
                collection
            })
            .collect();
        bar.finish_and_clear();

        let mut merged = PrImmCollection::new(graph.n(), seeds.clone());
        for partial in partials {
            merged.merge(partial);
        }
        merged
    }

    /// draws `n_samples` slow-analyzed sketches per candidate center,
    /// feeding a single shared collection behind one mutex.
    pub fn sample_sa(
        &self,
        centers: &[NodeId],
        n_samples: u64,
        graph: &Graph,
        seeds: &SeedSet,
        priority: &Priority,
        lambda: f64,
        threshold: f64,
    ) -> SaImmCollection {
        let collection = Mutex::new(SaImmCollection::new(graph.n(), threshold, seeds.clone()));
        let chunk = centers.len().div_ceil(self.workers).max(1);
        let bar = crate::progress(centers.len());

        centers.par_chunks(chunk).for_each(|chunk_centers| {
            let mut sampler = LinkSampler::new(graph.n_edges());
            let mut sketch = Sketch::new(graph.n());
            let mut rng = seeded_rng();
            for &center in chunk_centers {
                let mut gains_by_boosted = vec![0.0; graph.n()];
                for _ in 0..n_samples {
                    sample_prr_sketch(graph, &mut sampler, seeds, center, &mut sketch, &mut rng);
                    simulate_no_boost(&mut sketch, seeds, priority);
                    calculate_center_state_to_slow(&mut sketch, priority);
                    let center_state = sketch.center_state;
                    for &v in sketch.nodes() {
                        gains_by_boosted[v] += gain(sketch.center_state_to[v], lambda) - gain(center_state, lambda);
                    }
                }
                collection.lock().unwrap().add(center, n_samples, &gains_by_boosted);
                bar.inc(1);
            }
        });
        bar.finish_and_clear();

        collection.into_inner().unwrap()
    }
}
