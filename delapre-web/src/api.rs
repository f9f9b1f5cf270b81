//! `fetch`-backed [`BookingApi`] built on `gloo-net`.
use crate::config;
use async_trait::async_trait;
use delapre_core::api::{
    AuthResponse, BookingRequest, Credentials, EventPayload, GuestBookingRequest, Registration,
    WaitlistRequest, paths,
};
use delapre_core::{
    ApiError, Booking, BookingApi, BookingScope, Category, DocumentKind, EventSummary, Location,
    Preferences, WaitlistEntry,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// REST client for the booking API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpApi {
    base: String,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(&config::api_base_url())
    }
}

impl HttpApi {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        config::join(&self.base, path)
    }

    fn request(&self, verb: Verb, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.url(path);
        let builder = match verb {
            Verb::Get => Request::get(&url),
            Verb::Post => Request::post(&url),
            Verb::Put => Request::put(&url),
            Verb::Delete => Request::delete(&url),
        };
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, verb: Verb, path: &str, token: Option<&str>) -> Result<Response, ApiError> {
        let response = self
            .request(verb, path, token)
            .send()
            .await
            .map_err(network)?;
        checked(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        verb: Verb,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Response, ApiError> {
        let request = self
            .request(verb, path, token)
            .json(body)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let response = request.send().await.map_err(network)?;
        checked(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError> {
        let response = self.send(Verb::Get, path, token).await?;
        decode(&response).await
    }
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::debug!("{} answered {status}", response.url());
    Err(ApiError::from_body(status, &body))
}

async fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait(?Send)]
impl BookingApi for HttpApi {
    async fn list_events(&self) -> Result<Vec<EventSummary>, ApiError> {
        self.fetch(paths::EVENTS, None).await
    }

    async fn create_event(&self, token: &str, event: &EventPayload) -> Result<(), ApiError> {
        self.send_json(Verb::Post, paths::EVENTS, Some(token), event)
            .await
            .map(drop)
    }

    async fn update_event(
        &self,
        token: &str,
        id: u64,
        event: &EventPayload,
    ) -> Result<(), ApiError> {
        self.send_json(Verb::Put, &paths::event(id), Some(token), event)
            .await
            .map(drop)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let response = self
            .send_json(Verb::Post, paths::LOGIN, None, credentials)
            .await?;
        decode(&response).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let response = self
            .send_json(Verb::Post, paths::REGISTER, None, registration)
            .await?;
        decode(&response).await
    }

    async fn list_bookings(
        &self,
        token: &str,
        scope: BookingScope,
    ) -> Result<Vec<Booking>, ApiError> {
        self.fetch(paths::bookings(scope), Some(token)).await
    }

    async fn create_booking(&self, token: &str, request: &BookingRequest) -> Result<(), ApiError> {
        self.send_json(Verb::Post, paths::BOOKINGS, Some(token), request)
            .await
            .map(drop)
    }

    async fn create_guest_booking(&self, request: &GuestBookingRequest) -> Result<(), ApiError> {
        self.send_json(Verb::Post, paths::GUEST_BOOKINGS, None, request)
            .await
            .map(drop)
    }

    async fn cancel_booking(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.send(Verb::Delete, &paths::booking(id), Some(token))
            .await
            .map(drop)
    }

    async fn list_waitlist(&self, token: &str) -> Result<Vec<WaitlistEntry>, ApiError> {
        self.fetch(paths::WAITLIST, Some(token)).await
    }

    async fn join_waitlist(
        &self,
        token: &str,
        event_id: u64,
        request: &WaitlistRequest,
    ) -> Result<(), ApiError> {
        self.send_json(
            Verb::Post,
            &paths::event_waitlist(event_id),
            Some(token),
            request,
        )
        .await
        .map(drop)
    }

    async fn leave_waitlist(&self, token: &str, id: u64) -> Result<(), ApiError> {
        self.send(Verb::Delete, &paths::waitlist_entry(id), Some(token))
            .await
            .map(drop)
    }

    async fn preferences(&self, token: &str) -> Result<Preferences, ApiError> {
        self.fetch(paths::PREFERENCES, Some(token)).await
    }

    async fn save_preferences(
        &self,
        token: &str,
        preferences: &Preferences,
    ) -> Result<(), ApiError> {
        self.send_json(Verb::Put, paths::PREFERENCES, Some(token), preferences)
            .await
            .map(drop)
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch(paths::CATEGORIES, None).await
    }

    async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.fetch(paths::LOCATIONS, None).await
    }

    async fn staff_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        self.fetch(paths::STAFF_BOOKINGS, Some(token)).await
    }

    async fn booking_document(
        &self,
        token: &str,
        id: u64,
        kind: DocumentKind,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(Verb::Get, &paths::booking_document(id, kind), Some(token))
            .await?;
        response.binary().await.map_err(network)
    }
}
