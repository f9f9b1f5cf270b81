//! Page controllers
//!
//! One controller per top-level section. A controller owns the view-local
//! sub-state (forms, filters, loaded lists, status lines); the shared client
//! record lives in [`crate::state::ClientState`].

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod events;
pub mod home;
pub mod preferences;
pub mod staff;

pub use auth::{AuthPage, AuthView};
pub use bookings::BookingsPage;
pub use cart::CartPage;
pub use events::{EventsPage, WaitlistPrompt};
pub use home::HomePage;
pub use preferences::PreferencesPage;
pub use staff::{StaffPage, StaffView};

use crate::effect::Effect;
use crate::route::Route;
use crate::shell::Section;
use crate::state::ClientState;

/// Show/guard/load lifecycle of a section.
pub trait PageController {
    fn section(&self) -> Section;

    /// Whether the section may be shown. Defaults to allowing everyone.
    fn guard(&self, _state: &ClientState) -> bool {
        true
    }

    /// Reset controller-local sub-state on every visit.
    fn on_show(&mut self, _state: &ClientState) {}

    /// Loads to start once the section is visible.
    fn load(&mut self, _state: &ClientState) -> Vec<Effect> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A status line shown inside a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pages {
    pub home: HomePage,
    pub events: EventsPage,
    pub bookings: BookingsPage,
    pub cart: CartPage,
    pub auth: AuthPage,
    pub staff: StaffPage,
    pub preferences: PreferencesPage,
}

impl Pages {
    pub fn controller_mut(&mut self, route: Route) -> &mut dyn PageController {
        match route {
            Route::Home => &mut self.home,
            Route::Events => &mut self.events,
            Route::Bookings => &mut self.bookings,
            Route::Cart => &mut self.cart,
            Route::Auth => &mut self.auth,
            Route::Staff => &mut self.staff,
            Route::Preferences => &mut self.preferences,
        }
    }
}

/// Shared guard for account-only sections.
#[must_use]
pub const fn signed_in(state: &ClientState) -> bool {
    state.is_authenticated()
}
