use serde::{Deserialize, Serialize};

/// Lower clamp bound for a simulated loss value.
pub const LOSS_MIN: f64 = 0.01;
/// Upper clamp bound for a simulated loss value.
pub const LOSS_MAX: f64 = 1.0;
/// Lower clamp bound for a simulated accuracy value.
pub const ACCURACY_MIN: f64 = 0.0;
/// Upper clamp bound for a simulated accuracy value.
pub const ACCURACY_MAX: f64 = 0.99;
/// Inclusive lower bound of a GPU utilization sample.
pub const GPU_MIN: f64 = 30.0;
/// Exclusive upper bound of a GPU utilization sample.
pub const GPU_MAX: f64 = 95.0;

/// Per-step (loss, accuracy) record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// 0-based step index within the run.
    pub step: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// One GPU utilization reading, in percent.
///
/// Samples are independent between steps and are never accumulated into a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpuSample {
    pub value: f64,
}
