//! CLI argument parser (A2, §4.11): a `clap::Parser` derive over every row
//! of the external interface's argument table.

use clap::{Parser, ValueEnum};

use crate::prr::state::Priority;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlgoKind {
    Auto,
    PrImm,
    SaImm,
    SaRgImm,
    Greedy,
    MaxDegree,
    PageRank,
}

#[derive(Parser, Debug)]
#[command(name = "boostspread")]
#[command(about = "competitive influence maximization over a two-message propagation model")]
pub struct Arguments {
    /// input graph file (`V E` header, then `u v p pB` lines)
    #[arg(long)]
    pub graph_path: String,

    /// input seed set file (`Na` indices, then `Nr` indices)
    #[arg(long)]
    pub seed_set_path: String,

    /// selection method
    #[arg(long, value_enum, default_value_t = AlgoKind::Auto)]
    pub algo: AlgoKind,

    /// priority over {Ca+,Ca,Cr,Cr-}, e.g. "Ca+ > Cr- > Cr > Ca"
    #[arg(long, default_value = "Ca+ > Cr- > Cr > Ca")]
    pub priority: String,

    /// objective weight in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub lambda: f64,

    /// selection size(s); the selector runs once per value
    #[arg(long = "k", alias = "n-boosted-nodes", value_delimiter = ',', default_value = "1")]
    pub k: Vec<usize>,

    /// hard cap on sketches sampled for PR-IMM
    #[arg(long, default_value_t = 1_000_000)]
    pub sample_limit: u64,

    /// cap on per-center samples for SA-IMM
    #[arg(long, default_value_t = 100_000)]
    pub sample_limit_sa: u64,

    /// fixed sample-count schedule for PR-IMM's static mode
    #[arg(long, value_delimiter = ',')]
    pub n_samples: Vec<u64>,

    /// fixed per-center sample-count schedule for SA-IMM's static mode
    #[arg(long = "n-samples-sa", value_delimiter = ',')]
    pub n_samples_sa: Vec<u64>,

    /// filter SA-IMM candidate centers whose distance to any seed exceeds this
    #[arg(long, default_value_t = usize::MAX)]
    pub sample_dist_limit_sa: usize,

    /// repetitions for the forward propagation simulator
    #[arg(long = "test-times", alias = "greedy-test-times", default_value_t = 10_000)]
    pub test_times: usize,

    /// IMM confidence-tightening parameter
    #[arg(long, default_value_t = 1.0)]
    pub ell: f64,

    /// approximation error for PR-IMM's martingale loop
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// approximation error for SA-IMM's martingale loop
    #[arg(long, default_value_t = 0.1)]
    pub epsilon_sa: f64,

    /// drop C7 entries whose mean gain falls below this threshold
    #[arg(long, default_value_t = 0.0)]
    pub gain_threshold_sa: f64,

    /// worker pool size; 0 uses all logical cores
    #[arg(long = "j", alias = "n-threads", default_value_t = 0)]
    pub n_threads: usize,
}

impl Arguments {
    pub fn priority(&self) -> Result<Priority, Error> {
        Priority::parse(&self.priority)
    }

    pub fn workers(&self) -> usize {
        if self.n_threads == 0 {
            num_cpus::get()
        } else {
            self.n_threads
        }
    }
}
