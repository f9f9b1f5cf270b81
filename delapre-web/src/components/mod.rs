pub mod event_card;
pub mod loading;
pub mod nav_bar;
pub mod status;

pub use event_card::EventCard;
pub use loading::Loading;
pub use nav_bar::NavBar;
pub use status::StatusLine;
