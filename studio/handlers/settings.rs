use std::io::Cursor;
use log::info;
use tiny_http::{Request, Response};

use crate::state::{FlashMessage, SharedState, Theme};
use crate::util::form::{form_get, parse_form};

fn read_form(request: &mut Request) -> Vec<(String, String)> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    parse_form(&body)
}

/// Where to send the browser back to after a sidebar form.
fn back_to(pairs: &[(String, String)]) -> &'static str {
    match form_get(pairs, "return") {
        Some("/model") => "/model",
        _ => "/",
    }
}

// ---------------------------------------------------------------------------
// POST /settings
// ---------------------------------------------------------------------------

/// Applies the learning rate and epoch count to the next run.
///
/// Each field is validated on its own; a rejected field keeps its previous value
/// and the reason is shown as a flash message.
pub fn handle_settings(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let pairs = read_form(request);
    let lr_s  = form_get(&pairs, "learning_rate").unwrap_or("").trim().to_owned();
    let ep_s  = form_get(&pairs, "epochs").unwrap_or("").trim().to_owned();

    let mut st = state.lock().unwrap();
    let mut errors = Vec::new();

    match lr_s.parse::<f64>() {
        Ok(lr) => if let Err(e) = st.settings.set_learning_rate(lr) { errors.push(e.to_string()) },
        Err(_) => errors.push(format!("learning rate '{}' is not a number", lr_s)),
    }
    match ep_s.parse::<usize>() {
        Ok(ep) => if let Err(e) = st.settings.set_epochs(ep) { errors.push(e.to_string()) },
        Err(_) => errors.push(format!("epochs '{}' is not a whole number", ep_s)),
    }

    st.flash = Some(if errors.is_empty() {
        info!(
            "settings updated: lr={} epochs={}",
            st.settings.learning_rate(),
            st.settings.epochs()
        );
        FlashMessage::success(format!(
            "Settings saved. The next run takes {} steps.",
            st.settings.max_steps()
        ))
    } else {
        FlashMessage::error(errors.join("; "))
    });
    drop(st);

    crate::routes::redirect(back_to(&pairs))
}

// ---------------------------------------------------------------------------
// POST /theme
// ---------------------------------------------------------------------------

pub fn handle_theme(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let pairs = read_form(request);
    if let Some(theme) = form_get(&pairs, "theme").and_then(Theme::parse) {
        state.lock().unwrap().theme = theme;
    }
    crate::routes::redirect(back_to(&pairs))
}
