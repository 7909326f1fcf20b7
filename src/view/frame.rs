use serde::Serialize;

use crate::sim::{ConfusionMatrix, GpuSample, MetricPoint, RunState, TrainingSettings};

use super::gauge::{band_index, to_gauge_value};
use super::progress::to_progress_percent;
use super::series::Field;

/// Display-ready payload for one step, as pushed to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepFrame {
    pub step: usize,
    pub max_steps: usize,
    pub loss: f64,
    pub accuracy: f64,
    pub loss_percent: u8,
    pub accuracy_percent: u8,
    pub gpu: f64,
    pub gpu_band: usize,
}

impl StepFrame {
    pub fn new(point: &MetricPoint, gpu: GpuSample, state: &RunState) -> Self {
        let gpu = to_gauge_value(gpu);
        StepFrame {
            step: point.step,
            max_steps: state.max_steps,
            loss: point.loss,
            accuracy: point.accuracy,
            loss_percent: to_progress_percent(Field::Loss, point.loss),
            accuracy_percent: to_progress_percent(Field::Accuracy, point.accuracy),
            gpu,
            gpu_band: band_index(gpu),
        }
    }
}

/// Downloadable record of the current run.
#[derive(Debug, Clone, Serialize)]
pub struct RunExport {
    pub settings: TrainingSettings,
    pub points: Vec<MetricPoint>,
    pub confusion_matrix: Option<ConfusionMatrix>,
}
