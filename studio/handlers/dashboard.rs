use std::io::Cursor;
use tiny_http::Response;

use observatory::view::chart::{line_chart_svg, ACCURACY_COLOR, LOSS_COLOR};
use observatory::view::{to_grid_view, to_series, Field};
use observatory::StepFrame;

use crate::render::{render_page, Chrome, Page};
use crate::state::{RunStatus, SharedState};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();

    let flash    = st.take_flash();
    let running  = st.is_running();
    let latest   = st.latest();
    let loss_svg = line_chart_svg(&to_series(&st.points, Field::Loss), "Real-Time Training Loss", LOSS_COLOR);
    let acc_svg  = line_chart_svg(&to_series(&st.points, Field::Accuracy), "Real-Time Model Accuracy", ACCURACY_COLOR);
    let confusion_html = st.confusion
        .map(|m| to_grid_view(&m).to_html())
        .unwrap_or_default();

    let (show_idle, show_done, status_line) = match &st.run {
        RunStatus::Idle => (true, false, String::new()),
        RunStatus::Running { max_steps, .. } => {
            (false, false, format!("Running: step {} of {}", st.points.len(), max_steps))
        }
        RunStatus::Done { elapsed_total_ms } => {
            (false, true, format!("{} steps in {:.1}s", st.points.len(), *elapsed_total_ms as f64 / 1000.0))
        }
    };
    let settings = st.settings;
    let theme    = st.theme;
    drop(st);

    let hide = |show: bool| if show { "" } else { "hidden" };
    let chrome = Chrome { theme, running, settings: &settings, flash: flash.as_ref() };

    let (loss_val, loss_pct, acc_val, acc_pct, gpu) = card_values(latest.as_ref());

    crate::routes::html_response(render_page(Page::Metrics, &chrome, |tmpl| {
        tmpl
            .replace("{{IDLE_HIDE}}",     hide(show_idle))
            .replace("{{METRICS_HIDE}}",  hide(!show_idle))
            .replace("{{DONE_HIDE}}",     hide(show_done))
            .replace("{{STATUS_LINE}}",   &status_line)
            .replace("{{LOSS_VAL}}",      &loss_val)
            .replace("{{LOSS_PCT}}",      &loss_pct)
            .replace("{{ACC_VAL}}",       &acc_val)
            .replace("{{ACC_PCT}}",       &acc_pct)
            .replace("{{GPU_VAL}}",       &gpu)
            .replace("{{LOSS_SVG}}",      &loss_svg)
            .replace("{{ACC_SVG}}",       &acc_svg)
            .replace("{{CONFUSION}}",     &confusion_html)
    }))
}

/// Card texts for the latest step; dashes before the first step.
fn card_values(latest: Option<&StepFrame>) -> (String, String, String, String, String) {
    match latest {
        Some(f) => (
            format!("{:.4}", f.loss),
            f.loss_percent.to_string(),
            format!("{:.2}%", f.accuracy * 100.0),
            f.accuracy_percent.to_string(),
            format!("{:.1}", f.gpu),
        ),
        None => ("--".into(), "0".into(), "--".into(), "0".into(), "0".into()),
    }
}
