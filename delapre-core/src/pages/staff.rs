use super::{Notice, PageController, signed_in};
use crate::api::ApiError;
use crate::effect::Effect;
use crate::forms::{EventDraft, format_time_input};
use crate::load::{Generation, Resource};
use crate::model::{Booking, Category, Location};
use crate::shell::Section;
use crate::state::ClientState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaffView {
    #[default]
    Dashboard,
    AddEvent,
    ManageBookings,
}

pub const STAFF_ONLY: &str = "This area is for staff only.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffPage {
    pub view: StaffView,
    pub draft: EventDraft,
    pub reference: Resource<(Vec<Category>, Vec<Location>)>,
    pub bookings: Resource<Vec<Booking>>,
    pub status: Option<Notice>,
    pub saving: bool,
    /// Event to open in the form on the next visit
    pending_edit: Option<u64>,
}

impl StaffPage {
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.reference
            .state()
            .ready()
            .map(|(categories, _)| categories.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        self.reference
            .state()
            .ready()
            .map(|(_, locations)| locations.as_slice())
            .unwrap_or_default()
    }

    pub fn select(&mut self, state: &ClientState, view: StaffView) -> Vec<Effect> {
        self.view = view;
        self.status = None;
        match view {
            StaffView::Dashboard => Vec::new(),
            StaffView::AddEvent => {
                if self.draft.is_editing() {
                    self.draft = EventDraft::default();
                }
                Vec::new()
            }
            StaffView::ManageBookings if state.is_staff() => vec![Effect::LoadStaffBookings {
                generation: self.bookings.begin(),
            }],
            StaffView::ManageBookings => Vec::new(),
        }
    }

    /// Queue an event for editing; it opens once the section is shown.
    pub fn request_edit(&mut self, event_id: u64) {
        self.pending_edit = Some(event_id);
    }

    /// Open the form for a queued edit, pre-filled from the cached event list.
    pub fn open_pending_edit(&mut self, state: &ClientState) {
        let Some(event_id) = self.pending_edit.take() else {
            return;
        };
        self.view = StaffView::AddEvent;
        match state.events.iter().find(|event| event.id == event_id) {
            Some(event) => self.draft = EventDraft::from_event(event),
            None => {
                log::warn!("event {event_id} is not in the cached list");
                self.status = Some(Notice::error("Failed to load event for editing."));
            }
        }
    }

    /// Take edited fields from the view, applying the time mask and the free toggle.
    pub fn update_draft(&mut self, mut draft: EventDraft) {
        draft.start_time = format_time_input(&draft.start_time);
        draft.end_time = format_time_input(&draft.end_time);
        let is_free = draft.is_free;
        draft.set_free(is_free);
        draft.editing = self.draft.editing;
        self.draft = draft;
    }

    pub fn save(&mut self, state: &ClientState) -> Option<Effect> {
        if self.saving {
            return None;
        }
        if !state.is_authenticated() {
            self.status = Some(Notice::error("You must be logged in to create events."));
            return None;
        }
        match self.draft.validate() {
            Ok(payload) => {
                self.status = None;
                self.saving = true;
                Some(Effect::SaveEvent {
                    id: self.draft.editing,
                    payload,
                })
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
                None
            }
        }
    }

    /// Returns whether the event list should be reloaded.
    pub fn finish_save(&mut self, id: Option<u64>, result: Result<(), ApiError>) -> bool {
        self.saving = false;
        match result {
            Ok(()) => {
                log::info!("event saved ({id:?})");
                let message = if id.is_some() {
                    "Event updated successfully!"
                } else {
                    "Event created successfully!"
                };
                self.status = Some(Notice::success(message));
                self.draft = EventDraft::default();
                true
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
                false
            }
        }
    }

    pub fn finish_reference(
        &mut self,
        generation: Generation,
        result: Result<(Vec<Category>, Vec<Location>), ApiError>,
    ) {
        self.reference.finish(generation, result);
    }

    pub fn finish_bookings(&mut self, generation: Generation, result: Result<Vec<Booking>, ApiError>) {
        self.bookings.finish(generation, result);
    }
}

impl PageController for StaffPage {
    fn section(&self) -> Section {
        Section::Staff
    }

    fn guard(&self, state: &ClientState) -> bool {
        signed_in(state)
    }

    fn on_show(&mut self, state: &ClientState) {
        self.view = StaffView::Dashboard;
        self.draft = EventDraft::default();
        self.status = None;
        self.open_pending_edit(state);
    }

    fn load(&mut self, state: &ClientState) -> Vec<Effect> {
        if !state.is_staff() {
            return Vec::new();
        }
        vec![Effect::LoadReferenceData {
            generation: self.reference.begin(),
        }]
    }
}
