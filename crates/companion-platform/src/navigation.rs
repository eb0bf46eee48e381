//! Browser location helpers.

use companion_types::{CompanionError, Result};

/// `window.location.pathname`, or `/` when unavailable.
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Full-page navigation to `url`.
pub fn redirect(url: &str) -> Result<()> {
    let window = web_sys::window()
        .ok_or_else(|| CompanionError::JsInterop("No window".to_string()))?;
    window
        .location()
        .set_href(url)
        .map_err(|e| CompanionError::JsInterop(format!("{:?}", e)))
}
