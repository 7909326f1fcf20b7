use std::io::Cursor;
use log::debug;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn content_type(value: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes())
        .expect("static header is valid")
}

fn with_body(status: u16, ctype: &str, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(StatusCode(status), vec![content_type(ctype)], Cursor::new(bytes), Some(len), None)
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    with_body(200, "text/html; charset=utf-8", body)
}

pub fn svg_response(body: String) -> Response<Cursor<Vec<u8>>> {
    with_body(200, "image/svg+xml", body)
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    let mut resp = Response::from_data(Vec::new()).with_status_code(StatusCode(303));
    if let Ok(h) = Header::from_bytes(&b"Location"[..], location.as_bytes()) {
        resp.add_header(h);
    }
    resp
}

pub fn json_download_response(body: String, filename: &str) -> Response<Cursor<Vec<u8>>> {
    let mut resp = with_body(200, "application/json", body);
    let disposition = format!("attachment; filename=\"{}\"", filename);
    if let Ok(h) = Header::from_bytes(&b"Content-Disposition"[..], disposition.as_bytes()) {
        resp.add_header(h);
    }
    resp
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    with_body(404, "text/plain", "404 Not Found".to_owned())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// All handlers except SSE return a response that the dispatcher sends.
/// The SSE handler takes ownership of the request to stream for the run's duration.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();

    debug!("{} {}", method, path);

    // SSE is long-lived; handler takes ownership and drives the stream loop.
    if method == Method::Get && path == "/run/events" {
        handlers::run_sse::handle(request, state);
        return;
    }

    let response = match (method, path.as_str()) {
        // ── Metrics tab ──────────────────────────────────────────────────
        (Method::Get,  "/")           => handlers::dashboard::handle_get(state),
        (Method::Post, "/run/start")  => handlers::run::handle_start(state),
        (Method::Post, "/run/reset")  => handlers::run::handle_reset(state),
        (Method::Get,  "/run/export") => handlers::run::handle_export(state),

        // ── Sidebar ──────────────────────────────────────────────────────
        (Method::Post, "/settings")   => handlers::settings::handle_settings(&mut request, state),
        (Method::Post, "/theme")      => handlers::settings::handle_theme(&mut request, state),

        // ── Model tab ────────────────────────────────────────────────────
        (Method::Get,  "/model")        => handlers::model::handle_get(state),
        (Method::Get,  "/topology.svg") => handlers::model::handle_svg(state),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
