//! PRR-sketch sampling pipeline: builder (C2), forward simulator (C3) and
//! the two gain analyzers (C4 fast, C5 slow).

pub mod builder;
pub mod fast;
pub mod simulate;
pub mod sketch;
pub mod slow;
pub mod state;

pub use builder::sample_prr_sketch;
pub use sketch::Sketch;
pub use state::{LinkState, NodeState, Priority};
