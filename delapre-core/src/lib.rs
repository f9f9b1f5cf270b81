//! Delapre Events storefront core
//!
//! Platform-agnostic client logic for the Delapre Events booking storefront: the
//! hash-fragment router, the client state store mirrored to key/value storage, cart
//! and checkout rules, and the page controllers that decide which view is visible.
//! This crate performs no I/O itself; browsers and tests plug in through the
//! [`KeyValueStore`], [`History`] and [`BookingApi`] traits.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod effect;
pub mod filter;
pub mod format;
pub mod forms;
pub mod history;
pub mod load;
pub mod model;
pub mod pages;
pub mod route;
pub mod router;
pub mod shell;
pub mod state;
pub mod storage;
pub mod storefront;

// Re-export commonly used types
pub use api::{ApiError, BookingApi};
pub use cart::{AddOutcome, Cart, CartError, CartLine, Guest, GuestType};
pub use checkout::{CheckoutError, validate_guest_contact};
pub use effect::{Effect, Job, Outcome};
pub use filter::EventFilter;
pub use forms::{EventDraft, FormError, LoginForm, PreferencesForm, RegisterForm};
pub use history::MemoryHistory;
pub use load::{Generation, LoadState, Resource};
pub use model::{
    AuthSession, Booking, BookingScope, Category, DocumentKind, Download, EventSummary, GuestInfo,
    Location, Preferences, User, WaitlistEntry,
};
pub use pages::{AuthView, Notice, NoticeKind, PageController, Pages, StaffView};
pub use route::Route;
pub use router::Router;
pub use shell::{Section, Shell};
pub use state::{ClientState, PersistError, StateStore};
pub use storage::MemoryStore;
pub use storefront::{Intent, MAX_HOPS, Storefront};

/// Trait for abstracting persistent key/value storage
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a raw value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written (for example a quota error).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting the navigable location (the URL fragment)
///
/// Methods take `&self`: the browser location is ambient state and the router,
/// page guards and the app shell all hold the same handle.
pub trait History {
    /// Current fragment including the leading `#`, or an empty string.
    fn fragment(&self) -> String;

    /// Set the fragment, creating a new history entry.
    fn push(&self, fragment: &str);

    /// Set the fragment without creating a new history entry.
    fn replace(&self, fragment: &str);

    /// Scroll the viewport back to the top after a navigation.
    fn scroll_to_top(&self) {}
}
