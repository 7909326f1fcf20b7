use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};
use std::time::Duration;

use crate::sim::{TrainingSettings, DEFAULT_EVAL_SAMPLES};
use crate::run::event::RunEvent;

/// Pause between steps used by the dashboard.
pub const DEFAULT_TICK: Duration = Duration::from_millis(200);

/// Configuration for a `run_loop` call.
///
/// # Fields
/// - `settings`: run length and noise, see [`TrainingSettings`]
/// - `tick`: pause after each step; pacing only, zero runs flat out
/// - `eval_samples`: label pairs drawn for the final confusion matrix
/// - `progress_tx`: optional channel sender; one `RunEvent` per step plus a final
///   event.  If the receiver is dropped the loop stops early.
/// - `stop_flag`: optional atomic flag; when set from another thread the loop
///   stops before the next step.
pub struct RunConfig {
    pub settings: TrainingSettings,
    pub tick: Duration,
    pub eval_samples: usize,
    pub progress_tx: Option<mpsc::Sender<RunEvent>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl RunConfig {
    /// Creates a `RunConfig` with the default tick, no channel and no stop flag.
    pub fn new(settings: TrainingSettings) -> Self {
        RunConfig {
            settings,
            tick: DEFAULT_TICK,
            eval_samples: DEFAULT_EVAL_SAMPLES,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
