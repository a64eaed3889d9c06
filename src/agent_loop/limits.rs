pub const DEFAULT_MAX_ROUNDS: usize = 20;
pub const MAX_ROUNDS_ENV: &str = "HEARTLOOP_MAX_ROUNDS";

/// Bounds on a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerLimits {
    /// Rounds one `run` may issue before stopping with
    /// [`LoopExit::RoundLimit`](super::LoopExit::RoundLimit).
    pub max_rounds: usize,
}

impl Default for RunnerLimits {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl RunnerLimits {
    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }
}

pub(crate) fn parse_positive_usize(value: &str) -> Option<usize> {
    let parsed = value.trim().parse::<usize>().ok()?;
    if parsed == 0 {
        None
    } else {
        Some(parsed)
    }
}
