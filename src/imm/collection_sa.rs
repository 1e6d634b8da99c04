//! SA-IMM sketch collection (C7, §4.7): per-center averaged gains, with
//! greedy and random-greedy selection over a submodular surrogate.

use rand::Rng;

use crate::graph::SeedSet;
use crate::NodeId;

pub struct SaImmCollection {
    n: usize,
    threshold: f64,
    seeds: SeedSet,
    gains_to_center: Vec<Vec<(NodeId, f64)>>,
    count_as_center: Vec<u64>,
}

impl SaImmCollection {
    pub fn new(n: usize, threshold: f64, seeds: SeedSet) -> Self {
        Self {
            n,
            threshold,
            seeds,
            gains_to_center: vec![Vec::new(); n],
            count_as_center: vec![0; n],
        }
    }

    pub fn n_records(&self) -> usize {
        self.gains_to_center.iter().map(|v| v.len()).sum()
    }

    /// accumulates `n_samples` worth of per-boosted-node totals gathered
    /// with `center` as the sketch center.
    pub fn add(&mut self, center: NodeId, n_samples: u64, total_gains_by_boosted: &[f64]) {
        let entries = &mut self.gains_to_center[center];
        for (s, &g) in total_gains_by_boosted.iter().enumerate() {
            if g <= 0.0 {
                continue;
            }
            match entries.binary_search_by_key(&s, |&(idx, _)| idx) {
                Ok(pos) => entries[pos].1 += g,
                Err(pos) => entries.insert(pos, (s, g)),
            }
        }
        self.count_as_center[center] += n_samples;
    }

    /// appends another collection's per-center gain records and sample
    /// counts; used to top up a running collection across adaptive rounds.
    pub fn merge(&mut self, other: SaImmCollection) {
        for v in 0..self.n {
            for &(s, g) in &other.gains_to_center[v] {
                let entries = &mut self.gains_to_center[v];
                match entries.binary_search_by_key(&s, |&(idx, _)| idx) {
                    Ok(pos) => entries[pos].1 += g,
                    Err(pos) => entries.insert(pos, (s, g)),
                }
            }
            self.count_as_center[v] += other.count_as_center[v];
        }
    }

    /// gainsByBoosted[s] = (v, mean gain) pairs with mean >= threshold.
    fn prepare_gains_by_boosted(&self) -> Vec<Vec<(NodeId, f64)>> {
        let mut by_boosted = vec![Vec::new(); self.n];
        for v in 0..self.n {
            if self.count_as_center[v] == 0 {
                continue;
            }
            for &(s, g) in &self.gains_to_center[v] {
                let mean = g / self.count_as_center[v] as f64;
                if mean >= self.threshold {
                    by_boosted[s].push((v, mean));
                }
            }
        }
        by_boosted
    }

    fn select_inner<R: Rng + ?Sized>(
        &self,
        k: usize,
        random_greedy: bool,
        rng: &mut R,
    ) -> (f64, Vec<NodeId>) {
        let gains_by_boosted = self.prepare_gains_by_boosted();
        let mut max_gain_to = vec![0.0; self.n];
        let mut excluded = vec![false; self.n];
        for &a in self.seeds.sa() {
            excluded[a] = true;
        }
        for &r in self.seeds.sr() {
            excluded[r] = true;
        }

        let mut res = 0.0;
        let mut selected = Vec::with_capacity(k);
        for _ in 0..k {
            let mut totals = vec![0.0; self.n];
            for s in 0..self.n {
                for &(v, g) in &gains_by_boosted[s] {
                    totals[s] += (g - max_gain_to[v]).max(0.0);
                }
            }
            for v in 0..self.n {
                if excluded[v] {
                    totals[v] = f64::NEG_INFINITY;
                }
            }

            let remaining = self.n - selected.len() - self.seeds.len();
            if remaining == 0 {
                break;
            }

            let cur = if random_greedy {
                let n_candidates = k.min(remaining);
                let mut indices: Vec<NodeId> = (0..self.n).collect();
                indices.sort_unstable_by(|&a, &b| totals[b].partial_cmp(&totals[a]).unwrap());
                indices[rng.random_range(0..n_candidates)]
            } else {
                argmax(&totals)
            };

            res += totals[cur];
            excluded[cur] = true;
            selected.push(cur);
            for &(v, g) in &gains_by_boosted[cur] {
                if g > max_gain_to[v] {
                    max_gain_to[v] = g;
                }
            }
        }
        (res, selected)
    }

    /// picks argmax marginal each round; approximation ratio >= (1-1/e)*OPT.
    pub fn select(&self, k: usize) -> (f64, Vec<NodeId>) {
        self.select_inner(k, false, &mut rand::rng())
    }

    /// picks uniformly among the top `min(k, remaining)` candidates by
    /// marginal each round; approximation ratio >= (1/e)*OPT.
    pub fn random_select<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> (f64, Vec<NodeId>) {
        self.select_inner(k, true, rng)
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
    use rand::SeedableRng;

    #[test]
    fn mean_accumulates_across_two_adds() {
        let seeds = SeedSet::new(4, vec![], vec![]);
        let mut collection = SaImmCollection::new(4, 0.0, seeds);
        collection.add(0, 10, &[0.0, 3.0, 0.0, 0.0]);
        collection.add(0, 10, &[0.0, 5.0, 0.0, 0.0]);
        let by_boosted = collection.prepare_gains_by_boosted();
        let entry = by_boosted[1].iter().find(|&&(v, _)| v == 0).unwrap();
        assert!((entry.1 - 0.4).abs() < 1e-9);
    }

    #[test]
    fn threshold_filters_small_means() {
        let seeds = SeedSet::new(3, vec![], vec![]);
        let mut collection = SaImmCollection::new(3, 0.2, seeds);
        collection.add(0, 10, &[0.0, 9.0, 1.0]);
        let by_boosted = collection.prepare_gains_by_boosted();
        assert!(by_boosted[1].iter().any(|&(v, _)| v == 0));
        assert!(by_boosted[2].is_empty());
    }

    #[test]
    fn random_select_picks_among_top_candidates_only() {
        let seeds = SeedSet::new(4, vec![], vec![]);
        let mut collection = SaImmCollection::new(4, 0.0, seeds);
        collection.add(3, 1, &[0.9, 0.9, 0.9, 0.0]);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(2);
        let (_, picked) = collection.random_select(3, &mut rng);
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
}
