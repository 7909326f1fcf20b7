use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::run::event::{RunEvent, RunOutcome};
use crate::run::run_config::RunConfig;
use crate::sim::{Engine, Result, SimError};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Drives `engine` through one full run and returns how it ended.
///
/// The engine is started with `config.settings`, advanced once per tick, and
/// evaluated when the last step has been produced.  Each step is published to
/// `config.progress_tx` as it happens; the final event is `Complete` or `Stopped`.
///
/// # Early termination
/// The loop stops (and the engine is stopped, keeping its points) if:
/// - `config.stop_flag` is set to `true`, checked once per step, **or**
/// - the `progress_tx` receiver has been dropped.
///
/// # Errors
/// Only `InvalidConfig`, when the settings cannot be applied to the engine.
pub fn run_loop<R: Rng>(engine: &mut Engine<R>, config: &RunConfig) -> Result<RunOutcome> {
    engine.set_noise_scale(config.settings.noise_scale())?;
    engine.start(config.settings.max_steps())?;

    let t_start = Instant::now();
    info!(
        "run started: steps={} lr={} noise_scale={:.2}",
        config.settings.max_steps(),
        config.settings.learning_rate(),
        engine.noise_scale()
    );

    loop {
        if stop_requested(config) {
            info!("stop requested at step {}", engine.state().current_step);
            return Ok(halt(engine, config));
        }

        let (point, gpu) = match engine.advance() {
            Ok(step) => step,
            Err(SimError::RunComplete) => break,
            Err(SimError::NotRunning) => return Ok(halt(engine, config)),
            Err(e) => return Err(e),
        };
        debug!(
            "step {}: loss={:.4} accuracy={:.4} gpu={:.1}",
            point.step, point.loss, point.accuracy, gpu.value
        );

        let event = RunEvent::Step { point, gpu, state: engine.state() };
        if !publish(config, event) {
            info!("progress receiver dropped at step {}", point.step + 1);
            return Ok(halt(engine, config));
        }

        if engine.state().is_complete() {
            break;
        }
        if !config.tick.is_zero() {
            thread::sleep(config.tick);
        }
    }

    engine.stop();
    let matrix = engine.evaluate(config.eval_samples);
    let steps = engine.state().current_step;
    info!(
        "run completed: steps={} correct={}/{} elapsed_ms={}",
        steps,
        matrix.correct(),
        matrix.total(),
        t_start.elapsed().as_millis()
    );
    publish(config, RunEvent::Complete { matrix, steps });

    Ok(RunOutcome::Completed(matrix))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &RunConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Sends `event` if a channel is configured. Returns `false` if the receiver is gone.
fn publish(config: &RunConfig, event: RunEvent) -> bool {
    match config.progress_tx {
        Some(ref tx) => tx.send(event).is_ok(),
        None => true,
    }
}

fn halt<R: Rng>(engine: &mut Engine<R>, config: &RunConfig) -> RunOutcome {
    engine.stop();
    let steps = engine.state().current_step;
    publish(config, RunEvent::Stopped { steps });
    RunOutcome::Stopped { steps }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use super::*;
    use crate::sim::TrainingSettings;

    fn fast_config(epochs: usize) -> RunConfig {
        let mut config = RunConfig::new(TrainingSettings::new(0.001, epochs).unwrap());
        config.tick = Duration::ZERO;
        config
    }

    #[test]
    fn test_full_run_emits_every_step_then_complete() {
        let (tx, rx) = mpsc::channel();
        let mut config = fast_config(2);
        config.progress_tx = Some(tx);

        let mut engine = Engine::seeded(11);
        let outcome = run_loop(&mut engine, &config).unwrap();
        drop(config);

        let events: Vec<RunEvent> = rx.iter().collect();
        assert_eq!(events.len(), 21);
        for (i, e) in events[..20].iter().enumerate() {
            match e {
                RunEvent::Step { point, state, .. } => {
                    assert_eq!(point.step, i);
                    assert_eq!(state.current_step, i + 1);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        match (&events[20], outcome) {
            (RunEvent::Complete { matrix, steps }, RunOutcome::Completed(m)) => {
                assert_eq!(*steps, 20);
                assert_eq!(*matrix, m);
                assert_eq!(m.total(), 100);
            }
            other => panic!("unexpected ending {other:?}"),
        }
        assert!(!engine.state().is_running);
        assert_eq!(engine.points().len(), 20);
    }

    #[test]
    fn test_stop_flag_halts_before_first_step() {
        let flag = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();
        let mut config = fast_config(10);
        config.stop_flag = Some(flag);
        config.progress_tx = Some(tx);

        let mut engine = Engine::seeded(12);
        let outcome = run_loop(&mut engine, &config).unwrap();
        drop(config);

        assert_eq!(outcome, RunOutcome::Stopped { steps: 0 });
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![RunEvent::Stopped { steps: 0 }]);
    }

    #[test]
    fn test_dropped_receiver_stops_run() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = fast_config(10);
        config.progress_tx = Some(tx);

        let mut engine = Engine::seeded(13);
        let outcome = run_loop(&mut engine, &config).unwrap();
        assert_eq!(outcome, RunOutcome::Stopped { steps: 1 });
        assert!(!engine.state().is_running);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let flag = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let mut config = fast_config(100);
        config.tick = Duration::from_millis(1);
        config.stop_flag = Some(flag.clone());
        config.progress_tx = Some(tx);

        let worker = thread::spawn(move || {
            let mut engine = Engine::seeded(14);
            run_loop(&mut engine, &config).unwrap()
        });

        // Wait for a few steps, then cancel.
        for _ in 0..3 {
            rx.recv().unwrap();
        }
        flag.store(true, Ordering::Relaxed);

        match worker.join().unwrap() {
            RunOutcome::Stopped { steps } => assert!((3..1000).contains(&steps)),
            other => panic!("expected a stopped run, got {other:?}"),
        }
    }
}
