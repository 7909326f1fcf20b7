use std::sync::{Arc, Mutex, atomic::AtomicBool};
use std::time::Duration;

use observatory::view::Topology;
use observatory::{ConfusionMatrix, MetricPoint, RunEvent, StepFrame, TrainingSettings};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

pub enum RunStatus {
    /// No run has been started since launch or the last reset.
    Idle,
    /// A run is being driven on a background thread, which alone consumes
    /// its event channel and records every event here.
    Running {
        run_id:    u64,
        stop_flag: Arc<AtomicBool>,
        max_steps: usize,
    },
    /// Every step ran and the confusion matrix is available.
    Done {
        elapsed_total_ms: u64,
    },
}

// ---------------------------------------------------------------------------
// UI preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme { Dark, Light }

impl Theme {
    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "dark"  => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _       => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark  => "dark",
            Theme::Light => "light",
        }
    }
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Training controls applied to the next run.
    pub settings:    TrainingSettings,
    pub theme:       Theme,
    /// Current run lifecycle.
    pub run:         RunStatus,
    /// Id handed to the next started run; results from older runs are discarded.
    pub next_run_id: u64,
    /// Points of the current run, in step order.
    pub points:      Vec<MetricPoint>,
    /// Display values of every step, parallel to `points`.
    pub frames:      Vec<StepFrame>,
    /// Final evaluation of a completed run.
    pub confusion:   Option<ConfusionMatrix>,
    /// One-shot flash message for the next page render.
    pub flash:       Option<FlashMessage>,
    /// Pause between steps.
    pub tick:        Duration,
    /// Base seed; each run uses `seed + run_id`.
    pub seed:        Option<u64>,
    /// The model tab diagram, rendered once at startup.
    pub topology_svg: String,
}

impl StudioState {
    pub fn new(settings: TrainingSettings, tick: Duration, seed: Option<u64>) -> Self {
        StudioState {
            settings,
            theme:        Theme::Dark,
            run:          RunStatus::Idle,
            next_run_id:  1,
            points:       Vec::new(),
            frames:       Vec::new(),
            confusion:    None,
            flash:        None,
            tick,
            seed,
            topology_svg: Topology::default().to_svg(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunStatus::Running { .. })
    }

    /// Id of the active run, if any.
    pub fn running_id(&self) -> Option<u64> {
        match self.run {
            RunStatus::Running { run_id, .. } => Some(run_id),
            _ => None,
        }
    }

    /// Discards everything recorded for the previous run.
    pub fn clear_run(&mut self) {
        self.points.clear();
        self.frames.clear();
        self.confusion = None;
    }

    /// Records one event from the run with id `run_id`.
    ///
    /// Events from any run other than the active one are ignored, so a reset
    /// cannot be overwritten by a late event. Returns whether the event was applied.
    pub fn apply(&mut self, run_id: u64, event: &RunEvent) -> bool {
        if self.running_id() != Some(run_id) {
            return false;
        }
        match event {
            RunEvent::Step { point, gpu, state } => {
                self.points.push(*point);
                self.frames.push(StepFrame::new(point, *gpu, state));
            }
            RunEvent::Complete { matrix, .. } => {
                self.confusion = Some(*matrix);
            }
            RunEvent::Stopped { .. } => {}
        }
        true
    }

    /// Display values of the most recent step.
    pub fn latest(&self) -> Option<StepFrame> {
        self.frames.last().copied()
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared state type: an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

#[cfg(test)]
mod tests {
    use super::*;
    use observatory::{GpuSample, RunState};

    fn running(state: &mut StudioState, run_id: u64) {
        state.run = RunStatus::Running {
            run_id,
            stop_flag: Arc::new(AtomicBool::new(false)),
            max_steps: 10,
        };
    }

    fn step(i: usize) -> RunEvent {
        RunEvent::Step {
            point: MetricPoint { step: i, loss: 0.5, accuracy: 0.5 },
            gpu:   GpuSample { value: 60.0 },
            state: RunState { is_running: true, current_step: i + 1, max_steps: 10 },
        }
    }

    #[test]
    fn test_apply_ignores_other_runs() {
        let mut st = StudioState::new(TrainingSettings::default(), Duration::ZERO, Some(1));
        running(&mut st, 2);

        assert!(!st.apply(1, &step(0)));
        assert!(st.apply(2, &step(0)));
        assert_eq!(st.points.len(), 1);
        assert_eq!(st.latest().map(|f| f.gpu_band), Some(1));
    }

    #[test]
    fn test_apply_keeps_frames_parallel_to_points() {
        let mut st = StudioState::new(TrainingSettings::default(), Duration::ZERO, None);
        running(&mut st, 5);
        for i in 0..3 {
            st.apply(5, &step(i));
        }
        st.apply(5, &RunEvent::Complete { matrix: ConfusionMatrix::default(), steps: 3 });

        assert_eq!(st.points.iter().map(|p| p.step).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(st.frames.iter().map(|f| f.step).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(st.confusion.is_some());

        st.clear_run();
        assert!(st.frames.is_empty());
        assert!(st.latest().is_none());
    }

    #[test]
    fn test_idle_state_ignores_events() {
        let mut st = StudioState::new(TrainingSettings::default(), Duration::ZERO, None);
        assert!(!st.apply(1, &step(0)));
        assert!(st.points.is_empty());
    }
}
