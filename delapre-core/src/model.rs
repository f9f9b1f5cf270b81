//! Wire and state records shared by the store, the controllers and the API seam.
use crate::cart::Guest;
use serde::{Deserialize, Serialize};

/// An event as listed by `GET /api/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_free: bool,
    /// Base price per adult in pounds
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub capacity: u32,
    /// Remaining places; `None` when the server did not compute it
    #[serde(default)]
    pub spots_left: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
}

impl EventSummary {
    /// Remaining capacity, falling back to the total capacity.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.spots_left.unwrap_or(self.capacity)
    }

    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.available() == 0
    }

    /// Adult price in pence; zero for free events.
    #[must_use]
    pub fn price_pence(&self) -> i64 {
        if self.is_free || !self.price.is_finite() || self.price <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let pence = (self.price * 100.0).round() as i64;
        pence
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// A signed-in session. Token and user only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Contact details remembered for repeat guest checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub guest_count: u32,
    #[serde(default)]
    pub guest_names: Vec<Guest>,
    #[serde(default)]
    pub booked_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
    pub event: EventSummary,
    // Staff listings add who booked and the code checked at the door.
    #[serde(default, alias = "verification_code")]
    pub confirmation_code: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Booking {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == "cancelled" || self.cancelled_at.is_some()
    }

    /// Who made the booking: the guest checkout name, else the account holder.
    #[must_use]
    pub fn attendee_name(&self) -> Option<String> {
        self.guest_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.user.as_ref().map(User::display_name))
    }

    #[must_use]
    pub fn attendee_email(&self) -> Option<&str> {
        self.guest_email
            .as_deref()
            .or_else(|| self.user.as_ref().map(|user| user.email.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingScope {
    #[default]
    Upcoming,
    History,
}

impl BookingScope {
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Upcoming => "/api/bookings",
            Self::History => "/api/bookings/history",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: u64,
    pub event_id: u64,
    #[serde(default = "one")]
    pub requested_spots: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub event: Option<EventSummary>,
}

const fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_opt_in: bool,
    #[serde(default)]
    pub sms_opt_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
}

/// PDF documents the API renders for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Receipt,
    Confirmation,
}

impl DocumentKind {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Confirmation => "confirmation",
        }
    }

    #[must_use]
    pub fn file_name(self, booking_id: u64) -> String {
        format!("{}-{booking_id}.pdf", self.segment())
    }
}

/// A downloaded document waiting to be handed to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
