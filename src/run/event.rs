use serde::Serialize;

use crate::sim::{ConfusionMatrix, GpuSample, MetricPoint, RunState};

/// Progress emitted by [`run_loop`](super::run_loop).
///
/// A run produces zero or more `Step` events followed by exactly one of `Complete`
/// or `Stopped`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunEvent {
    Step {
        point: MetricPoint,
        gpu: GpuSample,
        state: RunState,
    },
    Complete {
        matrix: ConfusionMatrix,
        steps: usize,
    },
    Stopped {
        steps: usize,
    },
}

/// How a call to [`run_loop`](super::run_loop) ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// Every step ran and the run was evaluated.
    Completed(ConfusionMatrix),
    /// The stop flag was raised or the receiver went away first.
    Stopped { steps: usize },
}
