use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use log::debug;
use serde_json::json;
use tiny_http::Request;

use observatory::view::{to_grid_view, to_series, Field};
use observatory::StepFrame;

use crate::state::{RunStatus, SharedState, StudioState};
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_PREAMBLE};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const KEEPALIVE_EVERY: u32 = 10;

/// `GET /run/events`: Server-Sent Events handler.
///
/// Takes ownership of `request` so the raw stream can be held open, then
/// hands the writer to [`stream_run`].
///
/// Client reconnection is handled natively by `EventSource`.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if write_sse(&mut writer, SSE_PREAMBLE).is_err() {
        return;
    }
    if stream_run(&mut writer, &state).is_err() {
        debug!("SSE client disconnected");
    }
}

/// Streams the active run to one viewer.
///
/// 1. Replays the run so far as a `history` event.
/// 2. Polls the recorded frames and sends each new one as a `step` event,
///    with a keep-alive ping after every ~500 ms without news.
/// 3. Once the run is no longer active, sends `complete` (with the
///    confusion matrix) or `idle`, then returns.
///
/// Viewers only read the shared state; the run thread is the sole writer.
pub fn stream_run<W: Write + ?Sized>(writer: &mut W, state: &SharedState) -> io::Result<()> {
    let (history, live, ending) = {
        let st = state.lock().unwrap();
        (history_event(&st), st.running_id().map(|id| (id, st.frames.len())), final_event(&st))
    };

    write_sse(writer, &history)?;
    let (run_id, mut sent) = match live {
        Some(live) => live,
        None => return write_sse(writer, &ending),
    };

    let mut quiet_polls = 0;
    loop {
        let (fresh, ending) = {
            let st = state.lock().unwrap();
            let ended = st.running_id() != Some(run_id);
            // After a reset the frames belong to nobody this stream knows about.
            let keep = !ended || matches!(st.run, RunStatus::Done { .. });
            let fresh: Vec<StepFrame> = match st.frames.get(sent..) {
                Some(frames) if keep => frames.to_vec(),
                _ => Vec::new(),
            };
            (fresh, ended.then(|| final_event(&st)))
        };

        for frame in &fresh {
            if let Ok(json) = serde_json::to_string(frame) {
                write_sse(writer, &format_sse_event("step", &json))?;
            }
        }
        sent += fresh.len();

        if let Some(ending) = ending {
            debug!("run {} ended; closing SSE stream", run_id);
            return write_sse(writer, &ending);
        }

        if fresh.is_empty() {
            quiet_polls += 1;
            if quiet_polls >= KEEPALIVE_EVERY {
                write_sse(writer, format_sse_keepalive())?;
                quiet_polls = 0;
            }
        } else {
            quiet_polls = 0;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// `history` event carrying both series and the latest step frame.
fn history_event(st: &StudioState) -> String {
    let payload = json!({
        "loss":     to_series(&st.points, Field::Loss),
        "accuracy": to_series(&st.points, Field::Accuracy),
        "latest":   st.latest(),
    });
    format_sse_event("history", &payload.to_string())
}

/// Terminal event describing how the run ended.
fn final_event(st: &StudioState) -> String {
    match (&st.run, st.confusion) {
        (RunStatus::Done { elapsed_total_ms }, Some(matrix)) => {
            let payload = json!({
                "grid":       to_grid_view(&matrix),
                "html":       to_grid_view(&matrix).to_html(),
                "elapsed_ms": elapsed_total_ms,
                "steps":      st.points.len(),
            });
            format_sse_event("complete", &payload.to_string())
        }
        _ => format_sse_event("idle", "{}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use observatory::TrainingSettings;

    use crate::handlers::run::{handle_reset, handle_start};

    fn shared(tick_ms: u64) -> SharedState {
        let settings = TrainingSettings::new(0.001, 1).unwrap();
        Arc::new(Mutex::new(StudioState::new(settings, Duration::from_millis(tick_ms), Some(11))))
    }

    /// Splits an SSE transcript into `(event, data)` pairs, skipping pings.
    fn events(raw: &[u8]) -> Vec<(String, serde_json::Value)> {
        let text = String::from_utf8_lossy(raw);
        text.split("\n\n")
            .filter_map(|block| {
                let name = block.strip_prefix("event: ")?.lines().next()?.to_owned();
                let data = block.lines().find_map(|l| l.strip_prefix("data: "))?;
                Some((name, serde_json::from_str(data).ok()?))
            })
            .collect()
    }

    /// Step indices a viewer saw, from the history replay plus live events.
    fn steps_seen(events: &[(String, serde_json::Value)]) -> Vec<u64> {
        let mut steps = Vec::new();
        for (name, data) in events {
            match name.as_str() {
                "history" => {
                    for pair in data["loss"].as_array().into_iter().flatten() {
                        steps.extend(pair[0].as_u64());
                    }
                }
                "step" => steps.extend(data["step"].as_u64()),
                _ => {}
            }
        }
        steps
    }

    #[test]
    fn test_concurrent_viewers_each_see_every_step() {
        let state = shared(20);
        handle_start(state.clone());

        let viewers: Vec<_> = (0..2)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || {
                    let mut buf: Vec<u8> = Vec::new();
                    stream_run(&mut buf, &state).unwrap();
                    buf
                })
            })
            .collect();

        for viewer in viewers {
            let seen = events(&viewer.join().unwrap());
            assert_eq!(steps_seen(&seen), (0..10).collect::<Vec<u64>>());
            assert_eq!(seen.last().map(|(name, _)| name.as_str()), Some("complete"));
        }
    }

    #[test]
    fn test_idle_stream_replays_and_closes() {
        let state = shared(0);
        let mut buf: Vec<u8> = Vec::new();
        stream_run(&mut buf, &state).unwrap();

        let seen = events(&buf);
        let names: Vec<&str> = seen.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["history", "idle"]);
        assert!(steps_seen(&seen).is_empty());
    }

    #[test]
    fn test_reset_ends_stream_with_idle() {
        let state = shared(30);
        handle_start(state.clone());

        let viewer = {
            let state = state.clone();
            thread::spawn(move || {
                let mut buf: Vec<u8> = Vec::new();
                stream_run(&mut buf, &state).unwrap();
                buf
            })
        };
        thread::sleep(Duration::from_millis(80));
        handle_reset(state.clone());

        let seen = events(&viewer.join().unwrap());
        assert_eq!(seen.last().map(|(name, _)| name.as_str()), Some("idle"));
        assert!(steps_seen(&seen).len() < 10);
    }
}
