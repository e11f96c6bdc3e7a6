//! Default-browser launch for the preview page.

use crate::errors::AppError;

/// URL the browser is pointed at once the listener is bound.
pub fn launch_url(host: &str, port: u16, path: &str) -> String {
    if path.starts_with('/') {
        format!("http://{host}:{port}{path}")
    } else {
        format!("http://{host}:{port}/{path}")
    }
}

/// Open `url` in the system's default browser.
///
/// Blocks until the launcher process has been spawned; call from a blocking thread.
pub fn open(url: &str) -> Result<(), AppError> {
    webbrowser::open(url).map_err(|e| AppError::Browser(format!("{url}: {e}")))
}
