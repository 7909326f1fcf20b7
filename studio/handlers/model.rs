use std::io::Cursor;
use tiny_http::Response;

use observatory::view::DEFAULT_LAYERS;

use crate::render::{render_page, Chrome, Page};
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// GET /model
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st   = state.lock().unwrap();
    let flash    = st.take_flash();
    let svg      = st.topology_svg.clone();
    let running  = st.is_running();
    let settings = st.settings;
    let theme    = st.theme;
    drop(st);

    let layers = DEFAULT_LAYERS
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" → ");

    let chrome = Chrome { theme, running, settings: &settings, flash: flash.as_ref() };
    crate::routes::html_response(render_page(Page::Model, &chrome, |tmpl| {
        tmpl
            .replace("{{TOPOLOGY_SVG}}",    &svg)
            .replace("{{TOPOLOGY_LAYERS}}", &layers)
    }))
}

// ---------------------------------------------------------------------------
// GET /topology.svg
// ---------------------------------------------------------------------------

pub fn handle_svg(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let svg = state.lock().unwrap().topology_svg.clone();
    crate::routes::svg_response(svg)
}
