//! Agent loop: rounds, continuation and run results.

pub mod limits;
pub mod runner;
pub mod types;

pub use limits::RunnerLimits;
pub use runner::{decide_continuation, Agent};
pub use types::*;
