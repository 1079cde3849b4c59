//! System clipboard support
//!
//! An arboard clipboard on Linux drops its contents together with the
//! handle, so the copy runs on a short-lived thread that keeps the handle
//! alive long enough for a clipboard manager to take the contents over.

use std::thread;

#[cfg(target_os = "linux")]
const LINUX_HOLD: std::time::Duration = std::time::Duration::from_secs(2);

/// Copy text to the system clipboard without blocking the draw loop.
///
/// Failures are logged, not surfaced; losing a copy is not worth an error
/// dialog.
pub fn copy(text: String) {
    thread::spawn(move || match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(&text) {
                tracing::warn!("clipboard copy failed: {e}");
                return;
            }
            #[cfg(target_os = "linux")]
            thread::sleep(LINUX_HOLD);
        }
        Err(e) => {
            tracing::warn!("clipboard unavailable: {e}");
        }
    });
}
