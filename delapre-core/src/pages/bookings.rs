use super::{Notice, PageController};
use crate::api::ApiError;
use crate::effect::Effect;
use crate::load::{Generation, Resource};
use crate::model::{Booking, BookingScope, DocumentKind, WaitlistEntry};
use crate::shell::Section;
use crate::state::ClientState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingsPage {
    pub scope: BookingScope,
    pub bookings: Resource<Vec<Booking>>,
    pub waitlist: Resource<Vec<WaitlistEntry>>,
    pub status: Option<Notice>,
}

impl BookingsPage {
    /// Loads for the current scope; nothing for signed-out visitors.
    pub fn reload(&mut self, state: &ClientState) -> Vec<Effect> {
        if !state.is_authenticated() {
            self.bookings.reset();
            self.waitlist.reset();
            return Vec::new();
        }
        vec![
            Effect::LoadBookings {
                scope: self.scope,
                generation: self.bookings.begin(),
            },
            Effect::LoadWaitlist {
                generation: self.waitlist.begin(),
            },
        ]
    }

    pub fn show_scope(&mut self, state: &ClientState, scope: BookingScope) -> Vec<Effect> {
        self.scope = scope;
        self.status = None;
        self.reload(state)
    }

    pub fn finish_bookings(&mut self, generation: Generation, result: Result<Vec<Booking>, ApiError>) {
        self.bookings.finish(generation, result);
    }

    pub fn finish_waitlist(
        &mut self,
        generation: Generation,
        result: Result<Vec<WaitlistEntry>, ApiError>,
    ) {
        self.waitlist.finish(generation, result);
    }

    pub fn cancel(&mut self, state: &ClientState, id: u64) -> Option<Effect> {
        self.status = None;
        state
            .is_authenticated()
            .then_some(Effect::CancelBooking { id })
    }

    pub fn leave_waitlist(&mut self, state: &ClientState, id: u64) -> Option<Effect> {
        self.status = None;
        state
            .is_authenticated()
            .then_some(Effect::LeaveWaitlist { id })
    }

    pub fn download(
        &mut self,
        state: &ClientState,
        booking_id: u64,
        kind: DocumentKind,
    ) -> Option<Effect> {
        self.status = None;
        state
            .is_authenticated()
            .then_some(Effect::DownloadDocument { booking_id, kind })
    }

    /// Record a failed action; the list itself stays as loaded.
    pub fn action_failed(&mut self, err: &ApiError) {
        self.status = Some(Notice::error(err.to_string()));
    }

    /// Drop everything loaded for the previous session.
    pub fn clear(&mut self) {
        self.scope = BookingScope::Upcoming;
        self.bookings.reset();
        self.waitlist.reset();
        self.status = None;
    }
}

impl PageController for BookingsPage {
    fn section(&self) -> Section {
        Section::Bookings
    }

    fn on_show(&mut self, _state: &ClientState) {
        self.scope = BookingScope::Upcoming;
        self.status = None;
    }

    fn load(&mut self, state: &ClientState) -> Vec<Effect> {
        self.reload(state)
    }
}
