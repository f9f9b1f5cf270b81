use super::{Notice, PageController};
use crate::api::ApiError;
use crate::effect::Effect;
use crate::filter::{EventFilter, category_options};
use crate::forms::parse_requested_spots;
use crate::load::{Generation, LoadState, Resource};
use crate::model::EventSummary;
use crate::shell::Section;
use crate::state::ClientState;

/// Waitlist dialog for a sold-out event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistPrompt {
    pub event_id: u64,
    pub spots: String,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsPage {
    pub filter: EventFilter,
    /// Tracks requests for the shared event list in `ClientState::events`
    listing: Resource<()>,
    pub waitlist: Option<WaitlistPrompt>,
    pub notice: Option<Notice>,
}

impl EventsPage {
    #[must_use]
    pub const fn listing(&self) -> &LoadState<()> {
        self.listing.state()
    }

    /// Request a fresh event list. Any list still in flight is superseded.
    pub fn reload(&mut self) -> Effect {
        Effect::LoadEvents {
            generation: self.listing.begin(),
        }
    }

    /// Returns the list to store when the response is current.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<Vec<EventSummary>, ApiError>,
    ) -> Option<Vec<EventSummary>> {
        match result {
            Ok(events) => self
                .listing
                .finish(generation, Ok::<_, ApiError>(()))
                .then_some(events),
            Err(err) => {
                log::warn!("event list failed to load: {err}");
                self.listing
                    .finish(generation, Err::<(), _>("Could not load events. Please try again."));
                None
            }
        }
    }

    #[must_use]
    pub fn visible<'a>(&self, state: &'a ClientState) -> Vec<&'a EventSummary> {
        self.filter.apply(&state.events)
    }

    #[must_use]
    pub fn categories(&self, state: &ClientState) -> Vec<String> {
        category_options(&state.events)
    }

    pub fn open_waitlist(&mut self, state: &ClientState, event_id: u64) {
        if !state.is_authenticated() {
            self.notice = Some(Notice::error("You must be logged in to join the waitlist."));
            return;
        }
        self.waitlist = Some(WaitlistPrompt {
            event_id,
            spots: String::from("1"),
            error: None,
            submitting: false,
        });
    }

    pub fn set_waitlist_spots(&mut self, spots: String) {
        if let Some(prompt) = self.waitlist.as_mut() {
            prompt.spots = spots;
        }
    }

    pub fn close_waitlist(&mut self) {
        self.waitlist = None;
    }

    pub fn submit_waitlist(&mut self) -> Option<Effect> {
        let prompt = self.waitlist.as_mut()?;
        if prompt.submitting {
            return None;
        }
        match parse_requested_spots(&prompt.spots) {
            Ok(requested_spots) => {
                prompt.error = None;
                prompt.submitting = true;
                Some(Effect::JoinWaitlist {
                    event_id: prompt.event_id,
                    requested_spots,
                })
            }
            Err(err) => {
                prompt.error = Some(err.to_string());
                None
            }
        }
    }

    /// Returns whether the event list should be reloaded.
    pub fn waitlist_joined(
        &mut self,
        state: &ClientState,
        event_id: u64,
        result: Result<(), ApiError>,
    ) -> bool {
        match result {
            Ok(()) => {
                self.waitlist = None;
                let title = state
                    .latest_event(event_id)
                    .map_or_else(|| String::from("this event"), |event| event.title.clone());
                log::info!("joined waitlist for event {event_id}");
                self.notice = Some(Notice::success(format!(
                    "You're on the waitlist for {title}."
                )));
                true
            }
            Err(err) => {
                if let Some(prompt) = self
                    .waitlist
                    .as_mut()
                    .filter(|prompt| prompt.event_id == event_id)
                {
                    prompt.submitting = false;
                    prompt.error = Some(err.to_string());
                } else {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                false
            }
        }
    }
}

impl PageController for EventsPage {
    fn section(&self) -> Section {
        Section::Events
    }

    fn on_show(&mut self, _state: &ClientState) {
        self.filter = EventFilter::default();
        self.waitlist = None;
        self.notice = None;
    }

    fn load(&mut self, _state: &ClientState) -> Vec<Effect> {
        vec![self.reload()]
    }
}
