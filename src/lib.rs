pub mod args;
pub mod baseline;
pub mod error;
pub mod graph;
pub mod imm;
pub mod io;
pub mod prr;
pub mod sampler;
pub mod sim;
pub mod workers;

pub use error::Error;

/// node identifier, dense index into `0..n`
pub type NodeId = usize;
pub type Probability = f64;
pub type Utility = f64;

/// how often the adaptive loop (C8) re-logs its doubling-schedule progress
pub const TRAINING_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

/// initialize logging to stderr
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term]).expect("initialize logger");
}

/// progress bar styled consistently across the pipeline
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_millis(250);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan} {pos}/{len}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let bar = indicatif::ProgressBar::new(n as u64);
    bar.set_style(style);
    bar.enable_steady_tick(tick);
    bar
}
