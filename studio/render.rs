/// Central template renderer for the observatory studio.
///
/// The studio uses a single HTML template (`studio/assets/observatory.html`) with
/// placeholder tokens like `{{TOKEN}}`.  This module loads the template at
/// compile time and exposes a single `render_page` function that accepts a
/// closure to do tab-specific placeholder substitution.
///
/// Placeholders shared by every page (active tab, theme, run flag, sidebar
/// controls, version) are resolved here after the closure runs; any token left
/// over is blanked so raw `{{TOKEN}}` strings never reach the browser.

use observatory::view::GAUGE_BANDS;
use observatory::TrainingSettings;

use crate::state::{FlashKind, FlashMessage, Theme};

const TEMPLATE: &str = include_str!("assets/observatory.html");

/// Which tab is active.
#[derive(Clone, Copy)]
pub enum Page {
    Metrics = 0,
    Model   = 1,
}

/// Values every page needs for the sidebar and header.
pub struct Chrome<'a> {
    pub theme:    Theme,
    pub running:  bool,
    pub settings: &'a TrainingSettings,
    pub flash:    Option<&'a FlashMessage>,
}

/// Renders the full studio page.
pub fn render_page<F>(page: Page, chrome: &Chrome<'_>, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = fill(TEMPLATE.to_owned());

    let return_path = match page {
        Page::Metrics => "/",
        Page::Model   => "/model",
    };
    let bands_json = serde_json::to_string(&GAUGE_BANDS).unwrap_or_else(|_| "[]".into());

    let (dark, light) = match chrome.theme {
        Theme::Dark  => ("checked", ""),
        Theme::Light => ("", "checked"),
    };

    html = html
        .replace("{{ACTIVE_TAB}}",     &(page as u8).to_string())
        .replace("{{THEME}}",          chrome.theme.as_str())
        .replace("{{THEME_DARK}}",     dark)
        .replace("{{THEME_LIGHT}}",    light)
        .replace("{{RUNNING}}",        if chrome.running { "true" } else { "false" })
        .replace("{{RETURN_PATH}}",    return_path)
        .replace("{{GAUGE_BANDS}}",    &bands_json)
        .replace("{{LEARNING_RATE}}",  &chrome.settings.learning_rate().to_string())
        .replace("{{EPOCHS}}",         &chrome.settings.epochs().to_string())
        .replace("{{FLASH}}",          &render_flash_html(chrome.flash))
        .replace("{{VERSION}}",        env!("CARGO_PKG_VERSION"));

    blank_remaining(html)
}

pub fn render_flash_html(flash: Option<&FlashMessage>) -> String {
    match flash {
        None    => String::new(),
        Some(f) => {
            let cls = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error   => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, cls, html_escape(&f.text))
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
