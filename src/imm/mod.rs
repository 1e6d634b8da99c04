//! Sketch collections and the adaptive sampling loop (C6-C8).

pub mod adaptive;
pub mod collection_pr;
pub mod collection_sa;

pub use adaptive::{pr_imm_dynamic, pr_imm_static, sa_imm_dynamic, sa_imm_static, ImmOutcome};
pub use collection_pr::PrImmCollection;
pub use collection_sa::SaImmCollection;
