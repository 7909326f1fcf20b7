/// Observatory Studio
///
/// A browser dashboard for synthetic training runs: live loss and accuracy
/// charts, a GPU gauge, and a confusion matrix when the run completes, plus a
/// static network diagram. Served by a synchronous tiny_http server; updates
/// stream over Server-Sent Events.
///
/// Run with:
///   RUST_LOG=info cargo run --bin studio --release
/// Then open http://127.0.0.1:7878 (override with OBSERVATORY_ADDR).
///
/// Tabs:
///   1. Metrics: start/reset a run, live charts, confusion matrix
///   2. Model: network topology diagram

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::info;
use tiny_http::Server;

use observatory::AppConfig;
use state::StudioState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let server = Server::http(&config.addr)
        .map_err(|e| anyhow!("failed to bind {}: {}", config.addr, e))?;

    let shared_state = Arc::new(Mutex::new(StudioState::new(
        config.settings,
        config.tick,
        config.seed,
    )));

    info!("observatory studio listening on http://{}", config.addr);
    info!(
        "defaults: epochs={} lr={} tick={}ms seed={:?}",
        config.settings.epochs(),
        config.settings.learning_rate(),
        config.tick.as_millis(),
        config.seed
    );

    // Each request is dispatched on its own thread so the SSE handler
    // (which blocks for the whole run) does not stall regular page loads
    // and form submissions.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }

    Ok(())
}
