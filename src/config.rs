use std::time::Duration;

use crate::run::DEFAULT_TICK;
use crate::sim::{Result, SimError, TrainingSettings};

pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";

pub const ENV_ADDR: &str = "OBSERVATORY_ADDR";
pub const ENV_TICK_MS: &str = "OBSERVATORY_TICK_MS";
pub const ENV_SEED: &str = "OBSERVATORY_SEED";
pub const ENV_EPOCHS: &str = "OBSERVATORY_EPOCHS";
pub const ENV_LEARNING_RATE: &str = "OBSERVATORY_LEARNING_RATE";

/// Process-level settings shared by the `observatory` and `studio` binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the studio listens on.
    pub addr: String,
    /// Pause between simulated steps.
    pub tick: Duration,
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Initial training controls.
    pub settings: TrainingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            addr: DEFAULT_ADDR.to_owned(),
            tick: DEFAULT_TICK,
            seed: None,
            settings: TrainingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for unset keys.
    ///
    /// # Errors
    /// `InvalidConfig` naming the variable whose value could not be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(addr) = lookup(ENV_ADDR) {
            let addr = addr.trim();
            if addr.is_empty() {
                return Err(SimError::invalid(format!("{ENV_ADDR} must not be empty")));
            }
            config.addr = addr.to_owned();
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_TICK_MS)? {
            config.tick = Duration::from_millis(ms);
        }
        config.seed = parse_var(&lookup, ENV_SEED)?;
        if let Some(epochs) = parse_var(&lookup, ENV_EPOCHS)? {
            config.settings.set_epochs(epochs).map_err(|e| named(ENV_EPOCHS, e))?;
        }
        if let Some(lr) = parse_var(&lookup, ENV_LEARNING_RATE)? {
            config.settings.set_learning_rate(lr).map_err(|e| named(ENV_LEARNING_RATE, e))?;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SimError::invalid(format!("{key}={raw:?} could not be parsed"))),
    }
}

fn named(key: &str, err: SimError) -> SimError {
    SimError::invalid(format!("{key}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick, Duration::from_millis(200));
    }

    #[test]
    fn test_reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_ADDR, "0.0.0.0:9000"),
            (ENV_TICK_MS, "0"),
            (ENV_SEED, "42"),
            (ENV_EPOCHS, "3"),
            (ENV_LEARNING_RATE, "0.01"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert!(config.tick.is_zero());
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.settings.max_steps(), 30);
        assert_eq!(config.settings.learning_rate(), 0.01);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        for (key, value) in [
            (ENV_TICK_MS, "soon"),
            (ENV_SEED, "-1"),
            (ENV_EPOCHS, "0"),
            (ENV_LEARNING_RATE, "1.0"),
            (ENV_ADDR, "  "),
        ] {
            match AppConfig::from_lookup(lookup(&[(key, value)])) {
                Err(SimError::InvalidConfig(msg)) => assert!(msg.contains(key), "{msg}"),
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }
}
