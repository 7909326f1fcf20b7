use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

pub const LEARNING_RATE_MIN: f64 = 0.0001;
pub const LEARNING_RATE_MAX: f64 = 0.1;
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;

pub const EPOCHS_MIN: usize = 1;
pub const EPOCHS_MAX: usize = 100;
pub const DEFAULT_EPOCHS: usize = 10;

/// Simulated steps produced for each requested epoch.
pub const STEPS_PER_EPOCH: usize = 10;

/// User-facing training controls.
///
/// Both values feed the simulation: `epochs` decides the run length and
/// `learning_rate` widens or narrows the noise around the loss and accuracy trends.
/// Setters reject out-of-range input and keep the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    learning_rate: f64,
    epochs: usize,
}

impl TrainingSettings {
    /// Builds settings from raw values, validating both.
    pub fn new(learning_rate: f64, epochs: usize) -> Result<Self> {
        let mut settings = TrainingSettings::default();
        settings.set_learning_rate(learning_rate)?;
        settings.set_epochs(epochs)?;
        Ok(settings)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn set_learning_rate(&mut self, lr: f64) -> Result<()> {
        if !lr.is_finite() || !(LEARNING_RATE_MIN..=LEARNING_RATE_MAX).contains(&lr) {
            return Err(SimError::invalid(format!(
                "learning rate {lr} is outside [{LEARNING_RATE_MIN}, {LEARNING_RATE_MAX}]"
            )));
        }
        self.learning_rate = lr;
        Ok(())
    }

    pub fn set_epochs(&mut self, epochs: usize) -> Result<()> {
        if !(EPOCHS_MIN..=EPOCHS_MAX).contains(&epochs) {
            return Err(SimError::invalid(format!(
                "epoch count {epochs} is outside [{EPOCHS_MIN}, {EPOCHS_MAX}]"
            )));
        }
        self.epochs = epochs;
        Ok(())
    }

    /// Number of steps a run started with these settings produces.
    pub fn max_steps(&self) -> usize {
        self.epochs * STEPS_PER_EPOCH
    }

    /// Multiplier applied to the loss and accuracy standard deviations.
    ///
    /// Each decade of learning rate above the default adds 0.25, clamped to [0.5, 1.5].
    pub fn noise_scale(&self) -> f64 {
        let decades = (self.learning_rate / DEFAULT_LEARNING_RATE).log10();
        (1.0 + 0.25 * decades).clamp(0.5, 1.5)
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        TrainingSettings {
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DEFAULT_MAX_STEPS;

    #[test]
    fn test_defaults_match_a_hundred_step_run() {
        let s = TrainingSettings::default();
        assert_eq!(s.max_steps(), DEFAULT_MAX_STEPS);
        assert!((s.noise_scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejected_values_keep_previous() {
        let mut s = TrainingSettings::default();
        s.set_epochs(20).unwrap();

        assert!(matches!(s.set_epochs(0), Err(SimError::InvalidConfig(_))));
        assert!(matches!(s.set_epochs(101), Err(SimError::InvalidConfig(_))));
        assert!(matches!(s.set_learning_rate(0.5), Err(SimError::InvalidConfig(_))));
        assert!(matches!(s.set_learning_rate(f64::NAN), Err(SimError::InvalidConfig(_))));

        assert_eq!(s.epochs(), 20);
        assert_eq!(s.learning_rate(), DEFAULT_LEARNING_RATE);
    }

    #[test]
    fn test_noise_scale_follows_learning_rate() {
        let low = TrainingSettings::new(LEARNING_RATE_MIN, 10).unwrap();
        let high = TrainingSettings::new(LEARNING_RATE_MAX, 10).unwrap();
        assert!((low.noise_scale() - 0.75).abs() < 1e-9);
        assert!((high.noise_scale() - 1.5).abs() < 1e-9);
    }
}
