use serde::{Deserialize, Serialize};

/// Step count used when nothing else is configured.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Lifecycle of a single simulated run.
///
/// Owned by the [`Engine`](super::Engine); everything else only sees `Copy` snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub is_running: bool,
    pub current_step: usize,
    pub max_steps: usize,
}

impl RunState {
    /// A stopped run with no steps taken.
    pub fn idle(max_steps: usize) -> Self {
        RunState { is_running: false, current_step: 0, max_steps }
    }

    /// True once every step of the run has been produced.
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.max_steps
    }
}

impl Default for RunState {
    fn default() -> Self {
        RunState::idle(DEFAULT_MAX_STEPS)
    }
}
