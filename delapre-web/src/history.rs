//! The browser location fragment behind the core `History` seam.
use crate::dom::{js_error_message, window};
use delapre_core::History;
use gloo::events::EventListener;

/// Reads and writes `location.hash`.
///
/// Both `push` and `replace` make the browser fire `hashchange`, which the app
/// feeds back into the router.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashHistory;

impl HashHistory {
    /// Call `callback` on every fragment change, including back/forward.
    ///
    /// The subscription lasts as long as the returned listener.
    #[must_use]
    pub fn listen(mut callback: impl FnMut() + 'static) -> Option<EventListener> {
        let window = window()?;
        Some(EventListener::new(&window, "hashchange", move |_| callback()))
    }
}

impl History for HashHistory {
    fn fragment(&self) -> String {
        window()
            .and_then(|window| window.location().hash().ok())
            .unwrap_or_default()
    }

    fn push(&self, fragment: &str) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) = window.location().set_hash(fragment) {
            log::warn!("could not navigate to {fragment}: {}", js_error_message(&err));
        }
    }

    fn replace(&self, fragment: &str) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) = window.location().replace(fragment) {
            log::warn!("could not redirect to {fragment}: {}", js_error_message(&err));
        }
    }

    fn scroll_to_top(&self) {
        if let Some(window) = window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
}
