//! Async load bookkeeping for views
use std::fmt::Display;

/// Monotonic request counter; a response is applied only if it carries the
/// latest generation of its view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A view's load state plus the generation of its newest request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource<T> {
    state: LoadState<T>,
    generation: Generation,
}

impl<T> Resource<T> {
    #[must_use]
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LoadState<T> {
        &mut self.state
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new request; any response still in flight becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.state = LoadState::Loading;
        self.generation
    }

    /// Apply a response. Returns `false` (and changes nothing) when stale.
    pub fn finish<E: Display>(&mut self, generation: Generation, result: Result<T, E>) -> bool {
        if generation != self.generation {
            log::warn!(
                "discarding stale response (generation {} behind {})",
                generation.value(),
                self.generation.value()
            );
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        true
    }

    /// Forget loaded data and invalidate outstanding requests.
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.state = LoadState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_request_wins_over_late_response() {
        let mut events: Resource<Vec<&str>> = Resource::default();
        let first = events.begin();
        let second = events.begin();
        assert!(events.finish(second, Ok::<_, String>(vec!["new"])));
        assert!(!events.finish(first, Ok::<_, String>(vec!["old"])));
        assert_eq!(events.state().ready(), Some(&vec!["new"]));
    }

    #[test]
    fn failure_keeps_message() {
        let mut prefs: Resource<u8> = Resource::default();
        let generation = prefs.begin();
        assert!(prefs.state().is_loading());
        prefs.finish(generation, Err("Request failed"));
        assert_eq!(prefs.state().error(), Some("Request failed"));
    }

    #[test]
    fn reset_invalidates_in_flight_requests() {
        let mut bookings: Resource<u8> = Resource::default();
        let generation = bookings.begin();
        bookings.reset();
        assert!(!bookings.finish(generation, Ok::<_, String>(1)));
        assert_eq!(bookings.state(), &LoadState::Idle);
    }
}
