//! Client state store
//!
//! Single source of truth for the auth session, the cart and remembered guest
//! details, mirrored to a [`KeyValueStore`]. Keys match the ones older clients
//! wrote, so existing browser data hydrates in place.
use crate::KeyValueStore;
use crate::cart::Cart;
use crate::model::{AuthSession, EventSummary, GuestInfo, User};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const CART_KEY: &str = "cart";
pub const GUEST_INFO_KEY: &str = "guestInfo";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not write {key}: {message}")]
    Write { key: &'static str, message: String },
    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The in-memory client record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub auth: Option<AuthSession>,
    pub cart: Cart,
    /// Last fetched event list; never persisted
    pub events: Vec<EventSummary>,
    pub guest_info: Option<GuestInfo>,
}

impl ClientState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.user().is_some_and(|user| user.is_staff)
    }

    /// Most recent snapshot of an event: the fetched list first, then the cart.
    #[must_use]
    pub fn latest_event(&self, event_id: u64) -> Option<&EventSummary> {
        self.events
            .iter()
            .find(|event| event.id == event_id)
            .or_else(|| self.cart.find_line(event_id).map(|line| &line.event))
    }
}

pub struct StateStore<S: KeyValueStore> {
    storage: S,
    state: ClientState,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Read persisted state, repairing anything older clients or corruption left behind.
    pub fn hydrate(storage: S) -> Self {
        let token = read_raw(&storage, TOKEN_KEY).filter(|token| !token.is_empty());
        let user = read_json::<User>(&storage, USER_KEY);
        let auth = match (token, user) {
            (Some(token), Some(user)) => Some(AuthSession { token, user }),
            (None, None) => None,
            _ => {
                log::warn!("discarding half-persisted auth session");
                None
            }
        };

        let cart = read_raw(&storage, CART_KEY)
            .and_then(|raw| parse_logged::<serde_json::Value>(CART_KEY, &raw))
            .map(|value| Cart::from_persisted(&value))
            .unwrap_or_default();
        let guest_info = read_json::<GuestInfo>(&storage, GUEST_INFO_KEY);

        Self {
            storage,
            state: ClientState {
                auth,
                cart,
                events: Vec::new(),
                guest_info,
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Mutable access for controllers. Persist with the matching `save_*` call.
    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Set or clear the session; token and user are written or removed together.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the write. Memory already holds the
    /// new session; on a failed write the stored pair is removed rather than
    /// left half-updated.
    pub fn set_auth_state(&mut self, auth: Option<AuthSession>) -> Result<(), PersistError> {
        self.state.auth = auth;
        let Some(session) = self.state.auth.as_ref() else {
            self.remove(TOKEN_KEY);
            self.remove(USER_KEY);
            return Ok(());
        };

        let user = serde_json::to_string(&session.user).map_err(|source| {
            PersistError::Serialize {
                key: USER_KEY,
                source,
            }
        })?;
        let written = self
            .write(TOKEN_KEY, &session.token)
            .and_then(|()| self.write(USER_KEY, &user));
        if written.is_err() {
            self.remove(TOKEN_KEY);
            self.remove(USER_KEY);
        }
        written
    }

    /// Persist the cart verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written.
    pub fn save_cart(&self) -> Result<(), PersistError> {
        let json = serde_json::to_string(&self.state.cart).map_err(|source| {
            PersistError::Serialize {
                key: CART_KEY,
                source,
            }
        })?;
        self.write(CART_KEY, &json)
    }

    /// Remember or forget guest checkout details, independent of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the details cannot be serialized or written.
    pub fn save_guest_info(&mut self, info: Option<GuestInfo>) -> Result<(), PersistError> {
        self.state.guest_info = info;
        match self.state.guest_info.as_ref() {
            Some(info) => {
                let json = serde_json::to_string(info).map_err(|source| {
                    PersistError::Serialize {
                        key: GUEST_INFO_KEY,
                        source,
                    }
                })?;
                self.write(GUEST_INFO_KEY, &json)
            }
            None => {
                self.remove(GUEST_INFO_KEY);
                Ok(())
            }
        }
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), PersistError> {
        self.storage
            .set(key, value)
            .map_err(|err| PersistError::Write {
                key,
                message: err.to_string(),
            })
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            log::warn!("could not remove {key}: {err}");
        }
    }
}

fn read_raw<S: KeyValueStore>(storage: &S, key: &str) -> Option<String> {
    storage.get(key).unwrap_or_else(|err| {
        log::warn!("could not read {key}: {err}");
        None
    })
}

fn read_json<T: DeserializeOwned>(storage: &impl KeyValueStore, key: &str) -> Option<T> {
    read_raw(storage, key).and_then(|raw| parse_logged(key, &raw))
}

fn parse_logged<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring unreadable {key}: {err}");
            None
        }
    }
}
