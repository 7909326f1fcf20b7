use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::confusion::{ConfusionMatrix, NUM_CLASSES};
use super::error::{Result, SimError};
use super::metric::{
    GpuSample, MetricPoint, ACCURACY_MAX, ACCURACY_MIN, GPU_MAX, GPU_MIN, LOSS_MAX, LOSS_MIN,
};
use super::run_state::{RunState, DEFAULT_MAX_STEPS};

/// Standard deviation of the loss noise at a noise scale of 1.
pub const LOSS_STD_DEV: f64 = 0.1;
/// Standard deviation of the accuracy noise at a noise scale of 1.
pub const ACCURACY_STD_DEV: f64 = 0.05;

/// Produces a synthetic training run one step at a time.
///
/// Loss drifts from 1 towards 0 and accuracy from 0 towards 1 as the run progresses,
/// each with Gaussian noise, so individual steps are not monotonic. The random source is
/// injected so runs can be replayed from a seed.
#[derive(Debug)]
pub struct Engine<R: Rng = StdRng> {
    state: RunState,
    points: Vec<MetricPoint>,
    latest_gpu: Option<GpuSample>,
    noise_scale: f64,
    rng: R,
}

impl Engine<StdRng> {
    /// Engine with a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Engine::new(StdRng::seed_from_u64(seed))
    }

    /// Engine seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Engine::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    pub fn new(rng: R) -> Self {
        Engine {
            state: RunState::idle(DEFAULT_MAX_STEPS),
            points: Vec::new(),
            latest_gpu: None,
            noise_scale: 1.0,
            rng,
        }
    }

    /// Current run state snapshot.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Points produced so far in the current run, in step order.
    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    /// The GPU sample from the most recent step, if any.
    pub fn latest_gpu(&self) -> Option<GpuSample> {
        self.latest_gpu
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    /// Sets the multiplier on the loss and accuracy noise.
    ///
    /// Non-finite or non-positive values are rejected and the previous scale is kept.
    pub fn set_noise_scale(&mut self, scale: f64) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SimError::invalid(format!("noise scale {scale} must be positive")));
        }
        self.noise_scale = scale;
        Ok(())
    }

    /// Begins a fresh run of `max_steps` steps, discarding any previous points.
    pub fn start(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(SimError::invalid("max_steps must be at least 1"));
        }
        self.points.clear();
        self.latest_gpu = None;
        self.state = RunState { is_running: true, current_step: 0, max_steps };
        Ok(())
    }

    /// Halts the run, keeping the points produced so far.
    pub fn stop(&mut self) {
        self.state.is_running = false;
    }

    /// Halts the run and discards its points.
    pub fn reset(&mut self) {
        self.state = RunState::idle(self.state.max_steps);
        self.points.clear();
        self.latest_gpu = None;
    }

    /// Produces the next step.
    ///
    /// # Errors
    /// `NotRunning` if the engine is stopped, `RunComplete` once `max_steps` points
    /// have been produced. Neither changes any state.
    pub fn advance(&mut self) -> Result<(MetricPoint, GpuSample)> {
        if !self.state.is_running {
            return Err(SimError::NotRunning);
        }
        if self.state.is_complete() {
            return Err(SimError::RunComplete);
        }

        let step = self.state.current_step;
        let progress = step as f64 / self.state.max_steps as f64;

        let loss = self
            .normal(1.0 - progress, LOSS_STD_DEV * self.noise_scale)
            .clamp(LOSS_MIN, LOSS_MAX);
        let accuracy = self
            .normal(progress, ACCURACY_STD_DEV * self.noise_scale)
            .clamp(ACCURACY_MIN, ACCURACY_MAX);
        let gpu = GpuSample { value: self.rng.gen_range(GPU_MIN..GPU_MAX) };

        let point = MetricPoint { step, loss, accuracy };
        self.points.push(point);
        self.latest_gpu = Some(gpu);
        self.state.current_step += 1;

        Ok((point, gpu))
    }

    /// Builds a confusion matrix from `num_samples` uncorrelated label pairs.
    ///
    /// Placeholder evaluation: true and predicted labels are drawn independently and
    /// uniformly, so the result does not depend on the run.
    pub fn evaluate(&mut self, num_samples: usize) -> ConfusionMatrix {
        let rng = &mut self.rng;
        ConfusionMatrix::from_pairs(
            (0..num_samples).map(|_| (rng.gen_range(0..NUM_CLASSES), rng.gen_range(0..NUM_CLASSES))),
        )
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }
}
