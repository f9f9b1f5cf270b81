//! Form models and their submit-time validation
//!
//! Each form keeps the raw input strings the view binds to and turns them into
//! an API payload on submit, so a rejected form never reaches the network.
use crate::api::{Credentials, EventPayload, Recurrence, Registration};
use crate::format::split_date_time;
use crate::model::{EventSummary, Preferences};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TIME_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").ok());

pub const DEFAULT_CAPACITY: &str = "20";
pub const WEEKLY: &str = "weekly";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Email, password, first name, and last name are required")]
    MissingRegistration,
    #[error("Enter a phone number before enabling SMS updates.")]
    PhoneRequiredForSms,
    #[error("Please enter a valid number.")]
    InvalidSpots,
    #[error("Please select a category.")]
    CategoryRequired,
    #[error("Event name is required.")]
    TitleRequired,
    #[error("Please select a location.")]
    LocationRequired,
    #[error("Enter a valid {0} date and time (HH:MM).")]
    InvalidDateTime(&'static str),
    #[error("The event must end after it starts.")]
    EndsBeforeStart,
    #[error("Capacity must be at least 1.")]
    InvalidCapacity,
    #[error("Enter a valid price.")]
    InvalidPrice,
    #[error("Please select an end date for the recurring event.")]
    RecurrenceEndRequired,
    #[error("Recurrence end date must be after the first event start date.")]
    RecurrenceEndTooEarly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns [`FormError::MissingCredentials`] when either field is blank.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns [`FormError::MissingRegistration`] when any field is blank.
    pub fn validate(&self) -> Result<Registration, FormError> {
        let registration = Registration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let blank = [
            &registration.first_name,
            &registration.last_name,
            &registration.email,
            &registration.password,
        ]
        .into_iter()
        .any(String::is_empty);
        if blank {
            return Err(FormError::MissingRegistration);
        }
        Ok(registration)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesForm {
    pub phone: String,
    pub email_opt_in: bool,
    pub sms_opt_in: bool,
}

impl From<&Preferences> for PreferencesForm {
    fn from(preferences: &Preferences) -> Self {
        Self {
            phone: preferences.phone.clone().unwrap_or_default(),
            email_opt_in: preferences.email_opt_in,
            sms_opt_in: preferences.sms_opt_in,
        }
    }
}

impl PreferencesForm {
    /// The SMS opt-in is only offered once a phone number is entered.
    #[must_use]
    pub fn sms_available(&self) -> bool {
        !self.phone.trim().is_empty()
    }

    /// # Errors
    ///
    /// Returns [`FormError::PhoneRequiredForSms`] when SMS is requested without a phone.
    pub fn validate(&self) -> Result<Preferences, FormError> {
        let phone = Some(self.phone.trim().to_string()).filter(|phone| !phone.is_empty());
        if self.sms_opt_in && phone.is_none() {
            return Err(FormError::PhoneRequiredForSms);
        }
        Ok(Preferences {
            phone,
            email_opt_in: self.email_opt_in,
            sms_opt_in: self.sms_opt_in,
        })
    }
}

/// Requested places for a waitlist entry; at least one.
///
/// # Errors
///
/// Returns [`FormError::InvalidSpots`] for anything but a positive whole number.
pub fn parse_requested_spots(raw: &str) -> Result<u32, FormError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|spots| *spots >= 1)
        .ok_or(FormError::InvalidSpots)
}

/// Mask typed input into `HH:MM`: digits only, at most four, colon after two.
#[must_use]
pub fn format_time_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() > 2 {
        format!("{}:{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[must_use]
pub fn is_valid_time(value: &str) -> bool {
    TIME_RE.as_ref().is_some_and(|re| re.is_match(value))
}

fn parse_date_time(date: &str, time: &str, which: &'static str) -> Result<NaiveDateTime, FormError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDateTime(which))?;
    let time = time.trim();
    if !is_valid_time(time) {
        return Err(FormError::InvalidDateTime(which));
    }
    let time =
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| FormError::InvalidDateTime(which))?;
    Ok(date.and_time(time))
}

/// The staff add/edit event form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Set when editing an existing event
    pub editing: Option<u64>,
    pub category_id: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub capacity: String,
    pub is_free: bool,
    pub price: String,
    pub repeat: bool,
    pub repeat_frequency: String,
    pub repeat_until: String,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            editing: None,
            category_id: String::new(),
            title: String::new(),
            location: String::new(),
            start_date: String::new(),
            start_time: String::new(),
            end_date: String::new(),
            end_time: String::new(),
            capacity: DEFAULT_CAPACITY.to_string(),
            is_free: false,
            price: String::new(),
            repeat: false,
            repeat_frequency: WEEKLY.to_string(),
            repeat_until: String::new(),
        }
    }
}

impl EventDraft {
    /// Pre-fill the form from a listed event. Recurrence is not offered when editing.
    #[must_use]
    pub fn from_event(event: &EventSummary) -> Self {
        let (start_date, start_time) = split_date_time(&event.starts_at).unwrap_or_default();
        let (end_date, end_time) = split_date_time(&event.ends_at).unwrap_or_default();
        let mut draft = Self {
            editing: Some(event.id),
            category_id: event.category_id.map(|id| id.to_string()).unwrap_or_default(),
            title: event.title.clone(),
            location: event.location.clone(),
            start_date,
            start_time,
            end_date,
            end_time,
            capacity: event.capacity.to_string(),
            price: format!("{:.2}", event.price),
            ..Self::default()
        };
        draft.set_free(event.is_free);
        draft
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    #[must_use]
    pub const fn heading(&self) -> &'static str {
        if self.is_editing() { "Edit Event" } else { "Add New Event" }
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Save Changes" } else { "Create Event" }
    }

    /// Free events always carry a zero price.
    pub fn set_free(&mut self, is_free: bool) {
        self.is_free = is_free;
        if is_free {
            self.price = String::from("0.00");
        }
    }

    /// # Errors
    ///
    /// Returns the first invalid field, in form order.
    pub fn validate(&self) -> Result<EventPayload, FormError> {
        let category_id = self
            .category_id
            .trim()
            .parse::<u64>()
            .map_err(|_| FormError::CategoryRequired)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(FormError::LocationRequired);
        }

        let starts_at = parse_date_time(&self.start_date, &self.start_time, "start")?;
        let ends_at = parse_date_time(&self.end_date, &self.end_time, "end")?;
        if ends_at <= starts_at {
            return Err(FormError::EndsBeforeStart);
        }

        let capacity = self
            .capacity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|capacity| *capacity >= 1)
            .ok_or(FormError::InvalidCapacity)?;

        let price = if self.is_free {
            0.0
        } else {
            let raw = self.price.trim();
            if raw.is_empty() {
                0.0
            } else {
                raw.parse::<f64>()
                    .ok()
                    .filter(|price| price.is_finite() && *price >= 0.0)
                    .ok_or(FormError::InvalidPrice)?
            }
        };

        let recurrence = if self.repeat && !self.is_editing() {
            let until = self.repeat_until.trim();
            if until.is_empty() {
                return Err(FormError::RecurrenceEndRequired);
            }
            let end_date = NaiveDate::parse_from_str(until, "%Y-%m-%d")
                .map_err(|_| FormError::RecurrenceEndRequired)?;
            if end_date <= starts_at.date() {
                return Err(FormError::RecurrenceEndTooEarly);
            }
            Some(Recurrence {
                frequency: self.repeat_frequency.clone(),
                end_date: until.to_string(),
            })
        } else {
            None
        };

        Ok(EventPayload {
            category_id: Some(category_id),
            title: title.to_string(),
            location: location.to_string(),
            starts_at: starts_at.format("%Y-%m-%dT%H:%M").to_string(),
            ends_at: ends_at.format("%Y-%m-%dT%H:%M").to_string(),
            capacity,
            is_free: self.is_free,
            price,
            recurrence,
        })
    }
}
