//! CLI entry point: reads a graph and seed set, runs the selected
//! boosted-node algorithm, then scores the result with the forward
//! propagation simulator.

use clap::Parser;
use colored::Colorize;

use boostspread::args::{AlgoKind, Arguments};
use boostspread::baseline::{max_degree_select, page_rank_select};
use boostspread::graph::{Graph, SeedSet};
use boostspread::imm::{pr_imm_dynamic, pr_imm_static, sa_imm_dynamic, sa_imm_static, ImmOutcome};
use boostspread::io::{read_graph, read_seeds};
use boostspread::prr::state::Priority;
use boostspread::sim::score_boosted;
use boostspread::workers::Pool;
use boostspread::NodeId;

/// runs the resolved algorithm once per `k` in `args.k`; a non-empty
/// `n-samples`/`n-samples-sa` schedule switches PR-IMM/SA-IMM to their
/// fixed-schedule variant and reports the schedule's final row.
fn run_selection(
    args: &Arguments,
    graph: &Graph,
    seeds: &SeedSet,
    priority: &Priority,
    pool: &Pool,
) -> anyhow::Result<Vec<(usize, f64, Vec<NodeId>)>> {
    if args.k.is_empty() {
        anyhow::bail!("k/n-boosted-nodes must have at least one value");
    }
    let algo = resolve_algo(args.algo, priority);

    let mut results = Vec::with_capacity(args.k.len());
    for &k in &args.k {
        let (total_gain, boosted) = match algo {
            AlgoKind::PrImm => {
                if !args.n_samples.is_empty() {
                    let rows = pr_imm_static(graph, seeds, priority, args.lambda, k, &args.n_samples, pool);
                    let ImmOutcome { total_gain, boosted, .. } =
                        rows.into_iter().last().expect("n-samples schedule is non-empty");
                    (total_gain, boosted)
                } else {
                    let ImmOutcome { total_gain, boosted, .. } =
                        pr_imm_dynamic(graph, seeds, priority, args.lambda, k, args.ell, args.epsilon, args.sample_limit, pool);
                    (total_gain, boosted)
                }
            }
            AlgoKind::SaImm | AlgoKind::SaRgImm => {
                let random_greedy = algo == AlgoKind::SaRgImm;
                if !args.n_samples_sa.is_empty() {
                    let rows = sa_imm_static(
                        graph,
                        seeds,
                        priority,
                        args.lambda,
                        k,
                        args.gain_threshold_sa,
                        args.sample_dist_limit_sa,
                        &args.n_samples_sa,
                        random_greedy,
                        pool,
                    );
                    let ImmOutcome { total_gain, boosted, .. } =
                        rows.into_iter().last().expect("n-samples-sa schedule is non-empty");
                    (total_gain, boosted)
                } else {
                    let ImmOutcome { total_gain, boosted, .. } = sa_imm_dynamic(
                        graph,
                        seeds,
                        priority,
                        args.lambda,
                        k,
                        args.gain_threshold_sa,
                        args.sample_dist_limit_sa,
                        args.ell,
                        args.epsilon_sa,
                        args.sample_limit_sa,
                        random_greedy,
                        pool,
                    );
                    (total_gain, boosted)
                }
            }
            AlgoKind::MaxDegree => (0.0, max_degree_select(graph, seeds, k)),
            AlgoKind::PageRank => (0.0, page_rank_select(graph, seeds, k, 0.85, 200)),
            AlgoKind::Auto | AlgoKind::Greedy => unreachable!("resolved above"),
        };
        results.push((k, total_gain, boosted));
    }
    Ok(results)
}

/// `auto` picks PR-IMM for monotone+submodular priorities and SA-IMM
/// otherwise; `greedy` is an alias for PR-IMM's greedy selection.
fn resolve_algo(algo: AlgoKind, priority: &Priority) -> AlgoKind {
    match algo {
        AlgoKind::Auto => {
            if priority.monotonic && priority.submodular {
                AlgoKind::PrImm
            } else {
                AlgoKind::SaImm
            }
        }
        AlgoKind::Greedy => AlgoKind::PrImm,
        other => other,
    }
}

fn main() -> anyhow::Result<()> {
    boostspread::init();
    let args = Arguments::parse();

    let graph = read_graph(&args.graph_path)?;
    let seeds = read_seeds(&args.seed_set_path, graph.n())?;
    let priority = args.priority()?;
    let pool = Pool::new(args.workers());

    log::info!(
        "loaded graph with {} nodes, {} edges, {} seeds",
        graph.n(),
        graph.n_edges(),
        seeds.len()
    );

    let results = run_selection(&args, &graph, &seeds, &priority, &pool)?;
    let mut rng = rand::rng();
    for (k, total_gain, boosted) in results {
        let (positive, negative, total) = score_boosted(&graph, &seeds, &priority, args.lambda, &boosted, args.test_times, &mut rng);

        println!("{}", format!("k={k}:").bold());
        println!("  {} {boosted:?}", "selected boosted nodes:".bold());
        println!("  {} {total_gain:.4}", "estimated marginal gain (selection):".bold());
        println!(
            "  {} positive={positive:.4} negative={negative:.4} total={total:.4}",
            "simulated gain vs. unboosted baseline:".bold()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boostspread::graph::Edge;
    use boostspread::prr::state::Priority;
    use clap::Parser;

    #[test]
    fn auto_picks_pr_imm_for_the_canonical_monotone_submodular_priority() {
        let priority = Priority::upper_bound();
        assert_eq!(resolve_algo(AlgoKind::Auto, &priority), AlgoKind::PrImm);
    }

    #[test]
    fn auto_falls_back_to_sa_imm_for_non_submodular_priorities() {
        let priority = Priority::new(0, 3, 2, 1);
        assert_eq!(resolve_algo(AlgoKind::Auto, &priority), AlgoKind::SaImm);
    }

    #[test]
    fn run_selection_produces_one_row_per_k() {
        let edges = (0..9).map(|i| Edge { from: 0, to: i + 1, p: 1.0, pb: 1.0 }).collect();
        let graph = Graph::build(10, edges);
        let seeds = SeedSet::new(10, vec![], vec![0]);
        let priority = Priority::upper_bound();
        let pool = Pool::new(2);
        let args = Arguments::try_parse_from([
            "boostspread",
            "--graph-path",
            "g.txt",
            "--seed-set-path",
            "s.txt",
            "--algo",
            "pr-imm",
            "--k",
            "1,2",
        ])
        .unwrap();

        let results = run_selection(&args, &graph, &seeds, &priority, &pool).unwrap();
        assert_eq!(results.iter().map(|(k, ..)| *k).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn run_selection_uses_the_static_schedule_when_n_samples_is_set() {
        let edges = (0..9).map(|i| Edge { from: 0, to: i + 1, p: 1.0, pb: 1.0 }).collect();
        let graph = Graph::build(10, edges);
        let seeds = SeedSet::new(10, vec![], vec![0]);
        let priority = Priority::upper_bound();
        let pool = Pool::new(2);
        let args = Arguments::try_parse_from([
            "boostspread",
            "--graph-path",
            "g.txt",
            "--seed-set-path",
            "s.txt",
            "--algo",
            "pr-imm",
            "--k",
            "1",
            "--n-samples",
            "10,20",
        ])
        .unwrap();

        let results = run_selection(&args, &graph, &seeds, &priority, &pool).unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].2.is_empty());
    }
}
