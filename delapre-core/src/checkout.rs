//! Checkout validation
//!
//! Everything here runs before a single request is sent; a failure leaves the
//! cart and the stored guest details untouched.
use crate::api::{BookingRequest, GuestBookingRequest};
use crate::cart::{Cart, CartLine};
use crate::model::GuestInfo;
use crate::state::ClientState;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[\d\s\-+()]{7,20}$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Please fill in the guest form or sign in to checkout.")]
    SignInRequired,
    #[error("Email address is required.")]
    EmailRequired,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Full name is required.")]
    NameRequired,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
    #[error("{title} is sold out")]
    SoldOut { title: String },
    #[error("Not enough spaces available for {title}")]
    NotEnoughSpaces { title: String },
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.as_ref().is_some_and(|re| re.is_match(phone))
}

/// Validate guest contact fields, in form order. Returns the trimmed details.
///
/// # Errors
///
/// Returns the first failing field: missing or malformed email, missing name,
/// or a phone number that is present but malformed.
pub fn validate_guest_contact(
    email: &str,
    name: &str,
    phone: &str,
) -> Result<GuestInfo, CheckoutError> {
    let email = email.trim();
    let name = name.trim();
    let phone = phone.trim();

    if email.is_empty() {
        return Err(CheckoutError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(CheckoutError::InvalidEmail);
    }
    if name.is_empty() {
        return Err(CheckoutError::NameRequired);
    }
    if !phone.is_empty() && !is_valid_phone(phone) {
        return Err(CheckoutError::InvalidPhone);
    }

    Ok(GuestInfo {
        email: email.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
    })
}

/// Re-check every line against the latest known availability.
///
/// # Errors
///
/// Stops at the first line that is sold out or asks for more places than remain.
pub fn validate_availability(state: &ClientState) -> Result<(), CheckoutError> {
    if state.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    for line in &state.cart.lines {
        let latest = state.latest_event(line.event.id).unwrap_or(&line.event);
        let available = latest.available();
        if available == 0 {
            return Err(CheckoutError::SoldOut {
                title: line.event.title.clone(),
            });
        }
        if line.guest_count > available {
            return Err(CheckoutError::NotEnoughSpaces {
                title: line.event.title.clone(),
            });
        }
    }
    Ok(())
}

fn booking_request(line: &CartLine) -> BookingRequest {
    BookingRequest {
        event_id: line.event.id,
        guest_count: line.guest_count,
        guest_names: line.guest_names.clone(),
    }
}

#[must_use]
pub fn booking_requests(cart: &Cart) -> Vec<BookingRequest> {
    cart.lines.iter().map(booking_request).collect()
}

#[must_use]
pub fn guest_booking_requests(cart: &Cart, info: &GuestInfo) -> Vec<GuestBookingRequest> {
    cart.lines
        .iter()
        .map(|line| GuestBookingRequest {
            booking: booking_request(line),
            email: info.email.clone(),
            name: info.name.clone(),
            phone: info.phone.clone(),
        })
        .collect()
}
