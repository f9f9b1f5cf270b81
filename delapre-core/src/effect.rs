//! Network work requested by the storefront
//!
//! Controllers never await. They queue an [`Effect`]; the host drains them as
//! [`Job`]s, runs each against a [`BookingApi`] and feeds the resulting
//! [`Outcome`] back through `Storefront::apply`.
use crate::api::{
    ApiError, AuthResponse, BookingApi, BookingRequest, Credentials, EventPayload,
    GuestBookingRequest, Registration, WaitlistRequest,
};
use crate::load::Generation;
use crate::model::{
    Booking, BookingScope, Category, DocumentKind, EventSummary, GuestInfo, Location, Preferences,
    WaitlistEntry,
};
use crate::pages::AuthView;
use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadEvents {
        generation: Generation,
    },
    LoadBookings {
        scope: BookingScope,
        generation: Generation,
    },
    LoadWaitlist {
        generation: Generation,
    },
    LoadPreferences {
        generation: Generation,
    },
    LoadReferenceData {
        generation: Generation,
    },
    LoadStaffBookings {
        generation: Generation,
    },
    Login(Credentials),
    Register(Registration),
    Checkout(Vec<BookingRequest>),
    GuestCheckout {
        info: GuestInfo,
        requests: Vec<GuestBookingRequest>,
    },
    CancelBooking {
        id: u64,
    },
    JoinWaitlist {
        event_id: u64,
        requested_spots: u32,
    },
    LeaveWaitlist {
        id: u64,
    },
    SavePreferences(Preferences),
    SaveEvent {
        id: Option<u64>,
        payload: EventPayload,
    },
    DownloadDocument {
        booking_id: u64,
        kind: DocumentKind,
    },
}

impl Effect {
    /// Whether the request carries the session token.
    #[must_use]
    pub const fn needs_token(&self) -> bool {
        !matches!(
            self,
            Self::LoadEvents { .. }
                | Self::LoadReferenceData { .. }
                | Self::Login(_)
                | Self::Register(_)
                | Self::GuestCheckout { .. }
        )
    }
}

/// An effect bound to the session token current when it was queued.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub effect: Effect,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Events {
        generation: Generation,
        result: Result<Vec<EventSummary>, ApiError>,
    },
    Bookings {
        generation: Generation,
        result: Result<Vec<Booking>, ApiError>,
    },
    Waitlist {
        generation: Generation,
        result: Result<Vec<WaitlistEntry>, ApiError>,
    },
    Preferences {
        generation: Generation,
        result: Result<Preferences, ApiError>,
    },
    ReferenceData {
        generation: Generation,
        result: Result<(Vec<Category>, Vec<Location>), ApiError>,
    },
    StaffBookings {
        generation: Generation,
        result: Result<Vec<Booking>, ApiError>,
    },
    SignedIn {
        view: AuthView,
        result: Result<AuthResponse, ApiError>,
    },
    /// Event ids booked before the first failure, if any
    CheckedOut {
        booked: Vec<u64>,
        result: Result<(), ApiError>,
    },
    GuestCheckedOut {
        info: GuestInfo,
        booked: Vec<u64>,
        result: Result<(), ApiError>,
    },
    BookingCancelled(Result<(), ApiError>),
    WaitlistJoined {
        event_id: u64,
        result: Result<(), ApiError>,
    },
    WaitlistLeft(Result<(), ApiError>),
    PreferencesSaved(Result<Preferences, ApiError>),
    EventSaved {
        id: Option<u64>,
        result: Result<(), ApiError>,
    },
    Document {
        booking_id: u64,
        kind: DocumentKind,
        result: Result<Vec<u8>, ApiError>,
    },
}

async fn with_token<'a, T, F, Fut>(token: Option<&'a str>, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&'a str) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match token {
        Some(token) => call(token).await,
        None => Err(ApiError::SignInRequired),
    }
}

impl Job {
    #[must_use]
    pub const fn new(effect: Effect, token: Option<String>) -> Self {
        Self { effect, token }
    }

    /// Perform the request(s). Never fails: errors travel inside the outcome.
    pub async fn run<A: BookingApi + ?Sized>(self, api: &A) -> Outcome {
        let token = self.token.as_deref();
        match self.effect {
            Effect::LoadEvents { generation } => Outcome::Events {
                generation,
                result: api.list_events().await,
            },
            Effect::LoadBookings { scope, generation } => Outcome::Bookings {
                generation,
                result: with_token(token, |token| api.list_bookings(token, scope)).await,
            },
            Effect::LoadWaitlist { generation } => Outcome::Waitlist {
                generation,
                result: with_token(token, |token| api.list_waitlist(token)).await,
            },
            Effect::LoadPreferences { generation } => Outcome::Preferences {
                generation,
                result: with_token(token, |token| api.preferences(token)).await,
            },
            Effect::LoadReferenceData { generation } => {
                let categories = api.categories().await;
                let locations = api.locations().await;
                Outcome::ReferenceData {
                    generation,
                    result: categories.and_then(|categories| {
                        locations.map(|locations| (categories, locations))
                    }),
                }
            }
            Effect::LoadStaffBookings { generation } => Outcome::StaffBookings {
                generation,
                result: with_token(token, |token| api.staff_bookings(token)).await,
            },
            Effect::Login(credentials) => Outcome::SignedIn {
                view: AuthView::Login,
                result: api.login(&credentials).await,
            },
            Effect::Register(registration) => Outcome::SignedIn {
                view: AuthView::Register,
                result: api.register(&registration).await,
            },
            Effect::Checkout(requests) => {
                let mut booked = Vec::new();
                for request in &requests {
                    if let Err(err) =
                        with_token(token, |token| api.create_booking(token, request)).await
                    {
                        return Outcome::CheckedOut {
                            booked,
                            result: Err(err),
                        };
                    }
                    booked.push(request.event_id);
                }
                Outcome::CheckedOut {
                    booked,
                    result: Ok(()),
                }
            }
            Effect::GuestCheckout { info, requests } => {
                let mut booked = Vec::new();
                for request in &requests {
                    if let Err(err) = api.create_guest_booking(request).await {
                        return Outcome::GuestCheckedOut {
                            info,
                            booked,
                            result: Err(err),
                        };
                    }
                    booked.push(request.booking.event_id);
                }
                Outcome::GuestCheckedOut {
                    info,
                    booked,
                    result: Ok(()),
                }
            }
            Effect::CancelBooking { id } => Outcome::BookingCancelled(
                with_token(token, |token| api.cancel_booking(token, id)).await,
            ),
            Effect::JoinWaitlist {
                event_id,
                requested_spots,
            } => {
                let request = WaitlistRequest { requested_spots };
                Outcome::WaitlistJoined {
                    event_id,
                    result: with_token(token, |token| {
                        api.join_waitlist(token, event_id, &request)
                    })
                    .await,
                }
            }
            Effect::LeaveWaitlist { id } => Outcome::WaitlistLeft(
                with_token(token, |token| api.leave_waitlist(token, id)).await,
            ),
            Effect::SavePreferences(preferences) => {
                let result =
                    with_token(token, |token| api.save_preferences(token, &preferences)).await;
                Outcome::PreferencesSaved(result.map(|()| preferences))
            }
            Effect::SaveEvent { id, payload } => {
                let result = match id {
                    Some(id) => {
                        with_token(token, |token| api.update_event(token, id, &payload)).await
                    }
                    None => with_token(token, |token| api.create_event(token, &payload)).await,
                };
                Outcome::EventSaved { id, result }
            }
            Effect::DownloadDocument { booking_id, kind } => Outcome::Document {
                booking_id,
                kind,
                result: with_token(token, |token| api.booking_document(token, booking_id, kind))
                    .await,
            },
        }
    }
}
