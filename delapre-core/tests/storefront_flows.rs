use async_trait::async_trait;
use delapre_core::api::{
    AuthResponse, BookingRequest, Credentials, EventPayload, GuestBookingRequest, Registration,
    WaitlistRequest,
};
use delapre_core::format::format_gbp;
use delapre_core::state::{CART_KEY, GUEST_INFO_KEY, TOKEN_KEY, USER_KEY};
use delapre_core::{
    ApiError, AuthView, Booking, BookingApi, BookingScope, Category, DocumentKind, Effect,
    EventSummary, GuestInfo, GuestType, History, Intent, Location, LoginForm, MemoryHistory,
    MemoryStore, Outcome, Preferences, Route, Section, StateStore, Storefront, User,
    WaitlistEntry,
};
use futures::executor::block_on;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Scripted API that records every call it receives.
#[derive(Default)]
struct FakeApi {
    events: RefCell<Vec<EventSummary>>,
    calls: RefCell<Vec<String>>,
    reject_booking_for: Cell<Option<u64>>,
    staff: Cell<bool>,
}

impl FakeApi {
    fn with_events(events: Vec<EventSummary>) -> Self {
        let api = Self::default();
        *api.events.borrow_mut() = events;
        api
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait(?Send)]
impl BookingApi for FakeApi {
    async fn list_events(&self) -> Result<Vec<EventSummary>, ApiError> {
        self.record("list_events");
        Ok(self.events.borrow().clone())
    }

    async fn create_event(&self, _token: &str, event: &EventPayload) -> Result<(), ApiError> {
        self.record(format!("create_event {}", event.title));
        Ok(())
    }

    async fn update_event(
        &self,
        _token: &str,
        id: u64,
        event: &EventPayload,
    ) -> Result<(), ApiError> {
        self.record(format!("update_event {id} {}", event.title));
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record(format!("login {}", credentials.email));
        if credentials.password != "secret" {
            return Err(ApiError::Status {
                status: 401,
                message: String::from("Invalid credentials"),
            });
        }
        Ok(AuthResponse {
            token: String::from("tok-ada"),
            user: User {
                first_name: String::from("Ada"),
                email: credentials.email.clone(),
                is_staff: self.staff.get(),
                ..User::default()
            },
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.record(format!("register {}", registration.email));
        Ok(AuthResponse {
            token: String::from("tok-new"),
            user: User {
                email: registration.email.clone(),
                ..User::default()
            },
        })
    }

    async fn list_bookings(
        &self,
        token: &str,
        scope: BookingScope,
    ) -> Result<Vec<Booking>, ApiError> {
        self.record(format!("list_bookings {token} {}", scope.endpoint()));
        Ok(Vec::new())
    }

    async fn create_booking(&self, token: &str, request: &BookingRequest) -> Result<(), ApiError> {
        self.record(format!("create_booking {token} {}", request.event_id));
        if self.reject_booking_for.get() == Some(request.event_id) {
            return Err(ApiError::Status {
                status: 409,
                message: String::from("Event is full"),
            });
        }
        Ok(())
    }

    async fn create_guest_booking(&self, request: &GuestBookingRequest) -> Result<(), ApiError> {
        self.record(format!(
            "create_guest_booking {} {}",
            request.email, request.booking.event_id
        ));
        Ok(())
    }

    async fn cancel_booking(&self, _token: &str, id: u64) -> Result<(), ApiError> {
        self.record(format!("cancel_booking {id}"));
        Ok(())
    }

    async fn list_waitlist(&self, _token: &str) -> Result<Vec<WaitlistEntry>, ApiError> {
        self.record("list_waitlist");
        Ok(Vec::new())
    }

    async fn join_waitlist(
        &self,
        _token: &str,
        event_id: u64,
        request: &WaitlistRequest,
    ) -> Result<(), ApiError> {
        self.record(format!(
            "join_waitlist {event_id} {}",
            request.requested_spots
        ));
        Ok(())
    }

    async fn leave_waitlist(&self, _token: &str, id: u64) -> Result<(), ApiError> {
        self.record(format!("leave_waitlist {id}"));
        Ok(())
    }

    async fn preferences(&self, _token: &str) -> Result<Preferences, ApiError> {
        self.record("preferences");
        Ok(Preferences::default())
    }

    async fn save_preferences(
        &self,
        _token: &str,
        _preferences: &Preferences,
    ) -> Result<(), ApiError> {
        self.record("save_preferences");
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("categories");
        Ok(vec![Category {
            id: 1,
            name: String::from("Tours"),
        }])
    }

    async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.record("locations");
        Ok(vec![Location {
            id: 1,
            name: String::from("Abbey"),
        }])
    }

    async fn staff_bookings(&self, _token: &str) -> Result<Vec<Booking>, ApiError> {
        self.record("staff_bookings");
        Ok(Vec::new())
    }

    async fn booking_document(
        &self,
        _token: &str,
        id: u64,
        kind: DocumentKind,
    ) -> Result<Vec<u8>, ApiError> {
        self.record(format!("booking_document {id} {}", kind.segment()));
        Ok(b"%PDF-1.4".to_vec())
    }
}

type App = Storefront<MemoryStore, MemoryHistory>;

fn event(id: u64, title: &str, price: f64, spots_left: u32) -> EventSummary {
    EventSummary {
        id,
        title: title.to_string(),
        starts_at: String::from("2025-03-01T10:00:00"),
        ends_at: String::from("2025-03-01T11:00:00"),
        location: String::from("Abbey"),
        price,
        capacity: 20,
        spots_left: Some(spots_left),
        category_id: Some(1),
        ..EventSummary::default()
    }
}

fn open(storage: &MemoryStore, fragment: &str) -> (App, Rc<MemoryHistory>) {
    let history = Rc::new(MemoryHistory::with_fragment(fragment));
    let mut app = Storefront::new(storage.clone(), Rc::clone(&history));
    app.start();
    (app, history)
}

fn sign_in(app: &mut App, api: &FakeApi) {
    app.dispatch(Intent::UpdateLogin(LoginForm {
        email: String::from("ada@example.org"),
        password: String::from("secret"),
    }));
    app.dispatch(Intent::SubmitLogin);
    block_on(app.run_until_idle(api));
}

#[test]
fn staff_route_without_session_lands_on_login() {
    let storage = MemoryStore::new();
    let api = FakeApi::default();
    let (mut app, history) = open(&storage, "#/staff");
    assert_ne!(app.shell().visible(), Some(Section::Staff));
    block_on(app.run_until_idle(&api));
    assert_eq!(history.fragment(), "#/auth");
    assert_eq!(app.shell().visible(), Some(Section::Auth));
    assert_eq!(app.pages().auth.view, AuthView::Login);
    assert!(api.calls().is_empty());
}

#[test]
fn signing_in_persists_session_and_opens_bookings() {
    let storage = MemoryStore::new();
    let api = FakeApi::default();
    let (mut app, history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);

    assert_eq!(history.fragment(), "#/bookings");
    assert_eq!(app.shell().visible(), Some(Section::Bookings));
    assert_eq!(storage.raw(TOKEN_KEY).as_deref(), Some("tok-ada"));
    assert!(storage.raw(USER_KEY).is_some());
    assert_eq!(api.count("list_bookings tok-ada"), 1);
    assert_eq!(api.count("list_waitlist"), 1);

    let (reopened, _history) = open(&storage, "#/bookings");
    assert!(reopened.state().is_authenticated());
    assert_eq!(reopened.shell().visible(), Some(Section::Bookings));
}

#[test]
fn rejected_login_stays_signed_out() {
    let storage = MemoryStore::new();
    let api = FakeApi::default();
    let (mut app, history) = open(&storage, "#/auth");
    app.dispatch(Intent::UpdateLogin(LoginForm {
        email: String::from("ada@example.org"),
        password: String::from("wrong"),
    }));
    app.dispatch(Intent::SubmitLogin);
    block_on(app.run_until_idle(&api));

    assert!(!app.state().is_authenticated());
    assert_eq!(history.fragment(), "#/auth");
    assert_eq!(
        app.pages().auth.status.as_ref().map(|notice| notice.message.as_str()),
        Some("Invalid credentials")
    );
    assert!(storage.raw(TOKEN_KEY).is_none());
}

#[test]
fn sign_out_clears_session_but_keeps_cart() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 5)]);
    let (mut app, history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::Navigate(Route::Auth));
    block_on(app.run_until_idle(&api));
    sign_in(&mut app, &api);

    app.dispatch(Intent::SignOut);
    block_on(app.run_until_idle(&api));
    assert!(!app.state().is_authenticated());
    assert!(storage.raw(TOKEN_KEY).is_none());
    assert!(storage.raw(USER_KEY).is_none());
    assert_eq!(app.state().cart.len(), 1);
    assert_eq!(history.fragment(), "#/");
    assert_eq!(app.shell().visible(), Some(Section::Home));
}

#[test]
fn sold_out_event_cannot_be_added() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 0)]);
    let (mut app, history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    assert_eq!(app.state().events.len(), 1);

    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));
    assert!(app.state().cart.is_empty());
    assert!(storage.raw(CART_KEY).is_none());
    assert_eq!(history.fragment(), "#/events");
    assert_eq!(
        app.pages().events.notice.as_ref().map(|notice| notice.message.as_str()),
        Some("Abbey Tour is sold out and cannot be booked.")
    );
}

#[test]
fn adult_and_child_line_shows_twelve_pounds() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 10.0, 5)]);
    let (mut app, history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));
    assert_eq!(history.fragment(), "#/cart");

    app.dispatch(Intent::SetGuestCount {
        event_id: 1,
        count: 2,
    });
    app.dispatch(Intent::SetGuestType {
        event_id: 1,
        index: 1,
        kind: GuestType::Child,
    });
    let line = app.state().cart.find_line(1).unwrap();
    assert_eq!(format_gbp(line.total_pence()), "£12.00");
    assert_eq!(format_gbp(app.state().cart.total_pence()), "£12.00");
    assert!(storage.raw(CART_KEY).unwrap().contains("\"Child\""));
}

#[test]
fn guest_checkout_with_bad_email_sends_nothing() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 5)]);
    let (mut app, _history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));
    let before = api.calls().len();

    app.dispatch(Intent::UpdateGuestContact(GuestInfo {
        email: String::from("not-an-email"),
        name: String::from("Ada"),
        phone: String::new(),
    }));
    app.dispatch(Intent::GuestCheckout);
    assert!(!app.has_pending_jobs());
    block_on(app.run_until_idle(&api));
    assert_eq!(api.calls().len(), before);
    assert_eq!(app.state().cart.len(), 1);
    assert!(
        app.pages()
            .cart
            .status
            .as_ref()
            .is_some_and(|notice| notice.is_error())
    );
}

#[test]
fn guest_checkout_remembers_details_and_empties_cart() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 5)]);
    let (mut app, history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));

    app.dispatch(Intent::UpdateGuestContact(GuestInfo {
        email: String::from(" ada@example.org "),
        name: String::from("Ada"),
        phone: String::new(),
    }));
    app.dispatch(Intent::GuestCheckout);
    block_on(app.run_until_idle(&api));

    assert_eq!(api.count("create_guest_booking ada@example.org 1"), 1);
    assert!(app.state().cart.is_empty());
    assert_eq!(storage.raw(CART_KEY).as_deref(), Some("[]"));
    assert!(storage.raw(GUEST_INFO_KEY).unwrap().contains("ada@example.org"));
    assert_eq!(history.fragment(), "#/cart");
    assert_eq!(
        app.pages().cart.status.as_ref().map(|notice| notice.message.as_str()),
        Some("Booking confirmed! A confirmation will be sent to ada@example.org.")
    );
}

#[test]
fn failed_checkout_stops_and_keeps_cart() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![
        event(1, "Abbey Tour", 8.0, 5),
        event(2, "History Talk", 5.0, 5),
        event(3, "Family Trail", 0.0, 5),
    ]);
    api.reject_booking_for.set(Some(2));
    let (mut app, history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);
    app.dispatch(Intent::Navigate(Route::Events));
    block_on(app.run_until_idle(&api));
    for id in [1, 2, 3] {
        app.dispatch(Intent::AddToCart(id));
        block_on(app.run_until_idle(&api));
    }
    assert_eq!(history.fragment(), "#/cart");

    app.dispatch(Intent::Checkout);
    block_on(app.run_until_idle(&api));

    assert_eq!(api.count("create_booking tok-ada 1"), 1);
    assert_eq!(api.count("create_booking tok-ada 2"), 1);
    assert_eq!(api.count("create_booking tok-ada 3"), 0);
    assert_eq!(app.state().cart.len(), 3);
    assert_eq!(history.fragment(), "#/cart");
    assert_eq!(
        app.pages().cart.status.as_ref().map(|notice| notice.message.as_str()),
        Some("Could not book History Talk: Event is full (already booked: Abbey Tour)")
    );
}

#[test]
fn successful_checkout_opens_bookings() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 5)]);
    let (mut app, history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);
    app.dispatch(Intent::Navigate(Route::Events));
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(1));
    block_on(app.run_until_idle(&api));

    app.dispatch(Intent::Checkout);
    block_on(app.run_until_idle(&api));
    assert!(app.state().cart.is_empty());
    assert_eq!(history.fragment(), "#/bookings");
    assert_eq!(app.shell().visible(), Some(Section::Bookings));
}

#[test]
fn stale_event_list_never_overwrites_newer_one() {
    let storage = MemoryStore::new();
    let (mut app, _history) = open(&storage, "#/events");
    let first = app.take_jobs();
    app.dispatch(Intent::Navigate(Route::Events));
    let second = app.take_jobs();
    let generation_of = |jobs: &[delapre_core::Job]| match jobs {
        [delapre_core::Job {
            effect: Effect::LoadEvents { generation },
            ..
        }] => *generation,
        other => panic!("expected one event load, got {other:?}"),
    };
    let older = generation_of(&first);
    let newer = generation_of(&second);

    app.apply(Outcome::Events {
        generation: newer,
        result: Ok(vec![event(2, "Newer", 1.0, 1)]),
    });
    app.apply(Outcome::Events {
        generation: older,
        result: Ok(vec![event(1, "Older", 1.0, 1)]),
    });
    assert_eq!(app.state().events.len(), 1);
    assert_eq!(app.state().events[0].title, "Newer");
}

/// Two lines as older clients stored them, guests as bare name strings.
const LEGACY_CART: &str = r#"[
    {"event": {"id": 1, "title": "Tour", "price": 8, "capacity": 10},
     "guest_count": 2, "guest_names": ["Ada", "Bo"]},
    {"event": {"id": 2, "title": "Talk", "capacity": 10, "spots_left": 3},
     "guest_count": 1, "guest_names": [{"name": "Cy", "type": "Concession"}],
     "maxGuests": 3}
]"#;

#[test]
fn persisted_carts_hydrate_for_any_size() {
    let legacy = LEGACY_CART;
    for (raw, expected) in [("[]", 0), (legacy, 2)] {
        let storage = MemoryStore::with_entries([(CART_KEY, raw)]);
        let (app, _history) = open(&storage, "");
        assert_eq!(app.state().cart.len(), expected);
        assert!(app.state().cart.invariants_hold());
    }

    let storage = MemoryStore::with_entries([(CART_KEY, legacy)]);
    let (app, _history) = open(&storage, "");
    let tour = app.state().cart.find_line(1).unwrap();
    assert_eq!(tour.guest_names[1].name, "Bo");
    assert_eq!(tour.guest_names[1].kind, GuestType::Adult);

    let single = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(5, "Trail", 3.0, 4)]);
    let (mut app, _history) = open(&single, "#/events");
    block_on(app.run_until_idle(&api));
    app.dispatch(Intent::AddToCart(5));
    app.dispatch(Intent::SetGuestName {
        event_id: 5,
        index: 0,
        name: String::from("Ada"),
    });
    let (reopened, _history) = open(&single, "");
    assert_eq!(reopened.state().cart, app.state().cart);
}

#[test]
fn legacy_cart_survives_save_and_reload() {
    let storage = MemoryStore::with_entries([(CART_KEY, LEGACY_CART)]);
    let first = StateStore::hydrate(storage.clone());
    assert_eq!(first.state().cart.len(), 2);
    first.save_cart().expect("cart saves");
    assert!(!storage.raw(CART_KEY).unwrap().contains(r#"["Ada","#));

    let second = StateStore::hydrate(storage.clone());
    assert_eq!(second.state().cart, first.state().cart);
    assert!(second.state().cart.invariants_hold());
    let tour = second.state().cart.find_line(1).unwrap();
    assert_eq!(tour.guest_names[0].name, "Ada");
    assert_eq!(tour.guest_names[1].kind, GuestType::Adult);
}

#[test]
fn unknown_route_redirects_home_without_trapping_back() {
    let storage = MemoryStore::new();
    let api = FakeApi::default();
    let (mut app, history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));

    history.push("#/nowhere");
    app.settle();
    assert_eq!(history.fragment(), "#/");
    assert_eq!(app.shell().visible(), Some(Section::Home));

    assert!(history.back());
    app.settle();
    assert_eq!(history.fragment(), "#/events");
    assert_eq!(app.shell().visible(), Some(Section::Events));
}

#[test]
fn joining_waitlist_reloads_events() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 0)]);
    let (mut app, _history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);
    app.dispatch(Intent::Navigate(Route::Events));
    block_on(app.run_until_idle(&api));
    let loads = api.count("list_events");

    app.dispatch(Intent::OpenWaitlist(1));
    app.dispatch(Intent::SetWaitlistSpots(String::from("2")));
    app.dispatch(Intent::SubmitWaitlist);
    block_on(app.run_until_idle(&api));

    assert_eq!(api.count("join_waitlist 1 2"), 1);
    assert_eq!(api.count("list_events"), loads + 1);
    assert!(app.pages().events.waitlist.is_none());
    assert_eq!(
        app.pages().events.notice.as_ref().map(|notice| notice.message.as_str()),
        Some("You're on the waitlist for Abbey Tour.")
    );
}

#[test]
fn staff_edit_opens_prefilled_form_and_updates() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(7, "History Talk", 5.0, 10)]);
    api.staff.set(true);
    let (mut app, history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);
    app.dispatch(Intent::Navigate(Route::Events));
    block_on(app.run_until_idle(&api));

    app.dispatch(Intent::EditEvent(7));
    block_on(app.run_until_idle(&api));
    assert_eq!(history.fragment(), "#/staff");
    assert_eq!(app.pages().staff.draft.editing, Some(7));
    assert_eq!(app.pages().staff.categories().len(), 1);

    app.dispatch(Intent::SaveEvent);
    block_on(app.run_until_idle(&api));
    assert_eq!(api.count("update_event 7 History Talk"), 1);
    assert_eq!(
        app.pages().staff.status.as_ref().map(|notice| notice.message.as_str()),
        Some("Event updated successfully!")
    );
}

#[test]
fn document_download_is_handed_over_once() {
    let storage = MemoryStore::new();
    let api = FakeApi::default();
    let (mut app, _history) = open(&storage, "#/auth");
    sign_in(&mut app, &api);

    app.dispatch(Intent::Download {
        booking_id: 9,
        kind: DocumentKind::Receipt,
    });
    block_on(app.run_until_idle(&api));
    let download = app.take_download().unwrap();
    assert_eq!(download.file_name, "receipt-9.pdf");
    assert!(download.bytes.starts_with(b"%PDF"));
    assert!(app.take_download().is_none());
}

#[test]
fn storage_failure_raises_app_notice() {
    let storage = MemoryStore::new();
    let api = FakeApi::with_events(vec![event(1, "Abbey Tour", 8.0, 5)]);
    let (mut app, _history) = open(&storage, "#/events");
    block_on(app.run_until_idle(&api));
    storage.reject_writes(true);
    app.dispatch(Intent::AddToCart(1));
    assert_eq!(app.state().cart.len(), 1);
    assert!(app.notice().is_some_and(|notice| notice.is_error()));
    app.dispatch(Intent::DismissNotice);
    assert!(app.notice().is_none());
}
