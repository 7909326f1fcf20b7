use std::sync::{Arc, atomic::{AtomicBool, Ordering}, mpsc};
use std::thread;
use std::time::Instant;
use std::io::Cursor;
use log::{info, warn};
use tiny_http::Response;

use observatory::view::RunExport;
use observatory::{run_loop, Engine, RunConfig, RunEvent, RunOutcome};

use crate::state::{FlashMessage, RunStatus, SharedState};

// ---------------------------------------------------------------------------
// POST /run/start
// ---------------------------------------------------------------------------

/// Starts a run with the current settings. A no-op while a run is active.
///
/// The engine runs on a worker thread. A second thread is the only consumer
/// of its event channel and records every event in the shared state, so any
/// number of SSE viewers can stream the same steps from there.
pub fn handle_start(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();

    if st.is_running() {
        drop(st);
        return crate::routes::redirect("/");
    }

    let run_id = st.next_run_id;
    st.next_run_id += 1;

    let (tx, rx) = mpsc::channel::<RunEvent>();
    let stop_flag = Arc::new(AtomicBool::new(false));

    let mut config = RunConfig::new(st.settings);
    config.tick        = st.tick;
    config.progress_tx = Some(tx);
    config.stop_flag   = Some(stop_flag.clone());

    st.run = RunStatus::Running {
        run_id,
        stop_flag,
        max_steps: st.settings.max_steps(),
    };
    st.clear_run();
    let seed = st.seed.map(|s| s.wrapping_add(run_id));
    drop(st);

    info!("starting run {}", run_id);

    let state_clone = state.clone();
    thread::spawn(move || {
        let t_start = Instant::now();

        // `config` moves into the worker, so the channel closes when it returns.
        let worker = thread::spawn(move || {
            let mut engine = match seed {
                Some(seed) => Engine::seeded(seed),
                None       => Engine::from_entropy(),
            };
            run_loop(&mut engine, &config)
        });

        for event in rx.iter() {
            if !state_clone.lock().unwrap().apply(run_id, &event) {
                // Reset while in flight; dropping `rx` halts the worker.
                break;
            }
        }
        drop(rx);

        let result = match worker.join() {
            Ok(result) => result,
            Err(_) => {
                warn!("run {} panicked", run_id);
                return;
            }
        };
        let elapsed_total_ms = t_start.elapsed().as_millis() as u64;

        let mut st = state_clone.lock().unwrap();
        if st.running_id() != Some(run_id) {
            info!("run {} discarded after reset", run_id);
            return;
        }

        st.run = match result {
            Ok(RunOutcome::Completed(_)) => RunStatus::Done { elapsed_total_ms },
            Ok(RunOutcome::Stopped { steps }) => {
                info!("run {} stopped after {} steps", run_id, steps);
                RunStatus::Idle
            }
            Err(e) => {
                warn!("run {} failed: {}", run_id, e);
                st.flash = Some(FlashMessage::error(format!("Run could not start: {}", e)));
                RunStatus::Idle
            }
        };
    });

    crate::routes::redirect("/")
}

// ---------------------------------------------------------------------------
// POST /run/reset
// ---------------------------------------------------------------------------

/// Stops any active run and clears the dashboard. Idempotent.
pub fn handle_reset(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();
    if let RunStatus::Running { stop_flag, run_id, .. } = &st.run {
        stop_flag.store(true, Ordering::Relaxed);
        info!("reset requested for run {}", run_id);
    }
    st.run = RunStatus::Idle;
    st.clear_run();
    drop(st);
    crate::routes::redirect("/")
}

// ---------------------------------------------------------------------------
// GET /run/export
// ---------------------------------------------------------------------------

pub fn handle_export(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = state.lock().unwrap();
    let export = RunExport {
        settings:         st.settings,
        points:           st.points.clone(),
        confusion_matrix: st.confusion,
    };
    drop(st);

    let json = serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".into());
    crate::routes::json_download_response(json, "observatory_run.json")
}
