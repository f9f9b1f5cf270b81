//! Booking REST API seam
//!
//! The storefront never performs I/O itself: every request goes through
//! [`BookingApi`], implemented over `fetch` in the browser and by fakes in tests.
use crate::cart::Guest;
use crate::model::{
    Booking, BookingScope, Category, DocumentKind, EventSummary, Location, Preferences, User,
    WaitlistEntry,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the server gives no message of its own.
pub const FALLBACK_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response from the server: {0}")]
    Decode(String),
    #[error("Please sign in to continue.")]
    SignInRequired,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build a status error from a non-success response body.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self::Status { status, message }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::SignInRequired | Self::Status { status: 401, .. })
    }
}

pub mod paths {
    use crate::model::{BookingScope, DocumentKind};

    pub const EVENTS: &str = "/api/events";
    pub const LOGIN: &str = "/api/auth/login";
    pub const REGISTER: &str = "/api/auth/register";
    pub const BOOKINGS: &str = "/api/bookings";
    pub const GUEST_BOOKINGS: &str = "/api/bookings/guest";
    pub const WAITLIST: &str = "/api/waitlist";
    pub const PREFERENCES: &str = "/api/user/preferences";
    pub const CATEGORIES: &str = "/api/categories";
    pub const LOCATIONS: &str = "/api/locations";
    pub const STAFF_BOOKINGS: &str = "/api/staff/bookings";

    #[must_use]
    pub fn event(id: u64) -> String {
        format!("{EVENTS}/{id}")
    }

    #[must_use]
    pub fn event_waitlist(event_id: u64) -> String {
        format!("{EVENTS}/{event_id}/waitlist")
    }

    #[must_use]
    pub const fn bookings(scope: BookingScope) -> &'static str {
        scope.endpoint()
    }

    #[must_use]
    pub fn booking(id: u64) -> String {
        format!("{BOOKINGS}/{id}")
    }

    #[must_use]
    pub fn booking_document(id: u64, kind: DocumentKind) -> String {
        format!("{BOOKINGS}/{id}/{}", kind.segment())
    }

    #[must_use]
    pub fn waitlist_entry(id: u64) -> String {
        format!("{WAITLIST}/{id}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub event_id: u64,
    pub guest_count: u32,
    pub guest_names: Vec<Guest>,
}

/// A booking made without an account; contact details travel with every line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestBookingRequest {
    #[serde(flatten)]
    pub booking: BookingRequest,
    pub email: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitlistRequest {
    pub requested_spots: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub frequency: String,
    pub end_date: String,
}

/// Body of `POST /api/events` and `PUT /api/events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub category_id: Option<u64>,
    pub title: String,
    pub location: String,
    pub starts_at: String,
    pub ends_at: String,
    pub capacity: u32,
    pub is_free: bool,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// One method per REST endpoint. Authenticated calls take the bearer token.
#[async_trait(?Send)]
pub trait BookingApi {
    async fn list_events(&self) -> Result<Vec<EventSummary>, ApiError>;

    async fn create_event(&self, token: &str, event: &EventPayload) -> Result<(), ApiError>;

    async fn update_event(&self, token: &str, id: u64, event: &EventPayload)
    -> Result<(), ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;

    async fn list_bookings(&self, token: &str, scope: BookingScope)
    -> Result<Vec<Booking>, ApiError>;

    async fn create_booking(&self, token: &str, request: &BookingRequest) -> Result<(), ApiError>;

    async fn create_guest_booking(&self, request: &GuestBookingRequest) -> Result<(), ApiError>;

    async fn cancel_booking(&self, token: &str, id: u64) -> Result<(), ApiError>;

    async fn list_waitlist(&self, token: &str) -> Result<Vec<WaitlistEntry>, ApiError>;

    async fn join_waitlist(
        &self,
        token: &str,
        event_id: u64,
        request: &WaitlistRequest,
    ) -> Result<(), ApiError>;

    async fn leave_waitlist(&self, token: &str, id: u64) -> Result<(), ApiError>;

    async fn preferences(&self, token: &str) -> Result<Preferences, ApiError>;

    async fn save_preferences(&self, token: &str, preferences: &Preferences)
    -> Result<(), ApiError>;

    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn locations(&self) -> Result<Vec<Location>, ApiError>;

    async fn staff_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError>;

    /// Raw PDF bytes of a receipt or confirmation.
    async fn booking_document(
        &self,
        token: &str,
        id: u64,
        kind: DocumentKind,
    ) -> Result<Vec<u8>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::GuestType;

    #[test]
    fn error_body_message_is_used_when_present() {
        let err = ApiError::from_body(409, r#"{"message": "Email already registered"}"#);
        assert_eq!(err.to_string(), "Email already registered");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn missing_or_unreadable_message_falls_back() {
        for body in ["", "<html>", "{}", r#"{"message": "  "}"#] {
            assert_eq!(ApiError::from_body(500, body).to_string(), FALLBACK_MESSAGE);
        }
        assert!(ApiError::from_body(401, "{}").is_unauthorized());
    }

    #[test]
    fn guest_booking_flattens_line_fields() {
        let request = GuestBookingRequest {
            booking: BookingRequest {
                event_id: 3,
                guest_count: 1,
                guest_names: vec![Guest {
                    name: String::from("Ada"),
                    kind: GuestType::Concession,
                }],
            },
            email: String::from("ada@example.org"),
            name: String::from("Ada"),
            phone: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["event_id"], 3);
        assert_eq!(json["guest_names"][0]["type"], "Concession");
        assert_eq!(json["email"], "ada@example.org");
    }

    #[test]
    fn document_paths_use_kind_segment() {
        assert_eq!(
            paths::booking_document(8, DocumentKind::Receipt),
            "/api/bookings/8/receipt"
        );
        assert_eq!(paths::event_waitlist(2), "/api/events/2/waitlist");
        assert_eq!(paths::bookings(BookingScope::History), "/api/bookings/history");
    }

    #[test]
    fn one_off_events_omit_recurrence() {
        let payload = EventPayload {
            category_id: Some(1),
            title: String::from("Talk"),
            location: String::from("Hall"),
            starts_at: String::from("2025-03-01T10:00"),
            ends_at: String::from("2025-03-01T11:00"),
            capacity: 20,
            is_free: true,
            price: 0.0,
            recurrence: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("recurrence").is_none());
    }
}
