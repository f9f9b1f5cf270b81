//! Storefront orchestration
//!
//! Ties the router, the state store, the section shell and the page
//! controllers together. Views send an [`Intent`]; network work leaves as
//! [`Job`]s and comes back as [`Outcome`]s through [`Storefront::apply`].
use crate::api::{ApiError, AuthResponse};
use crate::cart::{CartError, GuestType};
use crate::effect::{Effect, Job, Outcome};
use crate::forms::{EventDraft, LoginForm, PreferencesForm, RegisterForm};
use crate::history::MemoryHistory;
use crate::model::{AuthSession, BookingScope, DocumentKind, Download, GuestInfo};
use crate::pages::{AuthView, Notice, Pages, StaffView};
use crate::route::Route;
use crate::router::{Router, navigate_to};
use crate::shell::Shell;
use crate::state::{ClientState, PersistError, StateStore};
use crate::{BookingApi, History, KeyValueStore};
use std::rc::Rc;

/// Navigations followed by [`Storefront::settle`] before giving up.
pub const MAX_HOPS: usize = 16;

const PERSIST_FAILED: &str =
    "Your changes could not be saved on this device. They will be lost when you close the page.";

/// Everything a user can do from a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Navigate(Route),
    SignOut,
    DismissNotice,

    SetSearch(String),
    SetCategory(String),
    AddToCart(u64),
    OpenWaitlist(u64),
    SetWaitlistSpots(String),
    SubmitWaitlist,
    CloseWaitlist,
    EditEvent(u64),

    SetGuestCount {
        event_id: u64,
        count: u32,
    },
    SetGuestName {
        event_id: u64,
        index: usize,
        name: String,
    },
    SetGuestType {
        event_id: u64,
        index: usize,
        kind: GuestType,
    },
    RemoveLine(u64),
    UpdateGuestContact(GuestInfo),
    Checkout,
    GuestCheckout,

    ShowBookings(BookingScope),
    RefreshBookings,
    CancelBooking(u64),
    LeaveWaitlist(u64),
    Download {
        booking_id: u64,
        kind: DocumentKind,
    },

    SelectAuthView(AuthView),
    UpdateLogin(LoginForm),
    UpdateRegister(RegisterForm),
    SubmitLogin,
    SubmitRegister,

    UpdatePreferences(PreferencesForm),
    SavePreferences,

    SelectStaffView(StaffView),
    UpdateDraft(EventDraft),
    SaveEvent,
}

/// State handed to route handlers.
pub struct Context<S: KeyValueStore, H: History> {
    store: StateStore<S>,
    history: Rc<H>,
    shell: Shell,
    pages: Pages,
    effects: Vec<Effect>,
    notice: Option<Notice>,
    download: Option<Download>,
}

impl<S: KeyValueStore, H: History> Context<S, H> {
    /// Guard, reveal, reset and load the section for `route`.
    fn enter(&mut self, route: Route) {
        let state = self.store.state();
        let controller = self.pages.controller_mut(route);
        if !controller.guard(state) {
            log::info!("{} requires sign-in, redirecting", route.path());
            self.pages.auth.select(AuthView::Login);
            navigate_to(self.history.as_ref(), Route::Auth.path(), true);
            return;
        }
        self.shell.show(controller.section());
        controller.on_show(state);
        let effects = controller.load(state);
        self.effects.extend(effects);
    }

    fn queue(&mut self, effect: Option<Effect>) {
        self.effects.extend(effect);
    }

    fn persisted(&mut self, result: Result<(), PersistError>) {
        if let Err(err) = result {
            log::warn!("{err}");
            self.notice = Some(Notice::error(PERSIST_FAILED));
        }
    }

    fn save_cart(&mut self) {
        let result = self.store.save_cart();
        self.persisted(result);
    }

    fn reload_events(&mut self) {
        let effect = self.pages.events.reload();
        self.effects.push(effect);
    }

    fn reload_bookings(&mut self) {
        let effects = self.pages.bookings.reload(self.store.state());
        self.effects.extend(effects);
    }
}

pub struct Storefront<S: KeyValueStore + 'static, H: History + 'static> {
    router: Router<Context<S, H>, H>,
    ctx: Context<S, H>,
}

impl<S: KeyValueStore + 'static, H: History + 'static> Storefront<S, H> {
    /// Hydrate from `storage` and register a handler for every route.
    pub fn new(storage: S, history: Rc<H>) -> Self {
        let mut router = Router::new(Rc::clone(&history));
        for route in Route::ALL {
            router.register(route.path(), move |ctx: &mut Context<S, H>| ctx.enter(route));
        }
        Self {
            router,
            ctx: Context {
                store: StateStore::hydrate(storage),
                history,
                shell: Shell::default(),
                pages: Pages::default(),
                effects: Vec::new(),
                notice: None,
                download: None,
            },
        }
    }

    /// Resolve the initial location.
    pub fn start(&mut self) {
        self.router.start(&mut self.ctx);
    }

    /// Call for every fragment-change or history-pop event.
    pub fn handle_location_change(&mut self) {
        self.router.navigate(&mut self.ctx);
    }

    /// Observe successful navigations, e.g. to update the document title.
    pub fn on_route_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.router.on_route_change(callback);
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        self.ctx.store.state()
    }

    #[must_use]
    pub const fn store(&self) -> &StateStore<S> {
        &self.ctx.store
    }

    #[must_use]
    pub const fn pages(&self) -> &Pages {
        &self.ctx.pages
    }

    #[must_use]
    pub const fn shell(&self) -> &Shell {
        &self.ctx.shell
    }

    /// App-wide notice, currently only raised for storage failures.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.ctx.notice.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &Rc<H> {
        self.router.history()
    }

    #[must_use]
    pub fn href(&self, path: &str) -> String {
        self.router.href(path)
    }

    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.router.is_active(path)
    }

    #[must_use]
    pub fn current_route(&self) -> Option<Route> {
        self.router.current_route().and_then(Route::from_path)
    }

    /// Whether any request is queued but not yet taken.
    #[must_use]
    pub fn has_pending_jobs(&self) -> bool {
        !self.ctx.effects.is_empty()
    }

    /// Drain queued effects, binding each to the current session token.
    pub fn take_jobs(&mut self) -> Vec<Job> {
        let token = self.ctx.store.state().token().map(str::to_string);
        self.ctx
            .effects
            .drain(..)
            .map(|effect| {
                let token = if effect.needs_token() {
                    token.clone()
                } else {
                    None
                };
                Job::new(effect, token)
            })
            .collect()
    }

    /// A finished document download, handed over once.
    pub fn take_download(&mut self) -> Option<Download> {
        self.ctx.download.take()
    }

    /// Show `route`, re-entering it when it is already current.
    fn go_to(&mut self, route: Route) {
        if self.router.is_active(route.path()) {
            self.ctx.enter(route);
        } else {
            self.router.navigate_to(route.path(), false);
        }
    }

    pub fn dispatch(&mut self, intent: Intent) {
        let ctx = &mut self.ctx;
        let state = ctx.store.state();
        let pages = &mut ctx.pages;
        match intent {
            Intent::Navigate(route) => self.go_to(route),
            Intent::SignOut => self.sign_out(),
            Intent::DismissNotice => ctx.notice = None,

            Intent::SetSearch(search) => pages.events.filter.search = search,
            Intent::SetCategory(category) => pages.events.filter.category = category,
            Intent::AddToCart(event_id) => self.add_to_cart(event_id),
            Intent::OpenWaitlist(event_id) => pages.events.open_waitlist(state, event_id),
            Intent::SetWaitlistSpots(spots) => pages.events.set_waitlist_spots(spots),
            Intent::SubmitWaitlist => {
                let effect = pages.events.submit_waitlist();
                ctx.queue(effect);
            }
            Intent::CloseWaitlist => pages.events.close_waitlist(),
            Intent::EditEvent(event_id) => self.edit_event(event_id),

            Intent::SetGuestCount { event_id, count } => {
                let result = ctx.store.state_mut().cart.set_guest_count(event_id, count);
                self.cart_edited(result.map(|_| ()));
            }
            Intent::SetGuestName {
                event_id,
                index,
                name,
            } => {
                let result = ctx
                    .store
                    .state_mut()
                    .cart
                    .set_guest_name(event_id, index, &name);
                self.cart_edited(result);
            }
            Intent::SetGuestType {
                event_id,
                index,
                kind,
            } => {
                let result = ctx
                    .store
                    .state_mut()
                    .cart
                    .set_guest_type(event_id, index, kind);
                self.cart_edited(result);
            }
            Intent::RemoveLine(event_id) => {
                if ctx.store.state_mut().cart.remove(event_id) {
                    log::debug!("removed event {event_id} from cart");
                    ctx.save_cart();
                }
            }
            Intent::UpdateGuestContact(info) => pages.cart.guest_form = info,
            Intent::Checkout => {
                let effect = pages.cart.checkout(state);
                ctx.queue(effect);
            }
            Intent::GuestCheckout => {
                let effect = pages.cart.guest_checkout(state);
                ctx.queue(effect);
            }

            Intent::ShowBookings(scope) => {
                let effects = pages.bookings.show_scope(state, scope);
                ctx.effects.extend(effects);
            }
            Intent::RefreshBookings => ctx.reload_bookings(),
            Intent::CancelBooking(id) => {
                let effect = pages.bookings.cancel(state, id);
                ctx.queue(effect);
            }
            Intent::LeaveWaitlist(id) => {
                let effect = pages.bookings.leave_waitlist(state, id);
                ctx.queue(effect);
            }
            Intent::Download { booking_id, kind } => {
                let effect = pages.bookings.download(state, booking_id, kind);
                ctx.queue(effect);
            }

            Intent::SelectAuthView(view) => pages.auth.select(view),
            Intent::UpdateLogin(form) => pages.auth.login = form,
            Intent::UpdateRegister(form) => pages.auth.register = form,
            Intent::SubmitLogin => {
                let effect = pages.auth.submit_login();
                ctx.queue(effect);
            }
            Intent::SubmitRegister => {
                let effect = pages.auth.submit_register();
                ctx.queue(effect);
            }

            Intent::UpdatePreferences(form) => pages.preferences.update_form(form),
            Intent::SavePreferences => {
                let effect = pages.preferences.save();
                ctx.queue(effect);
            }

            Intent::SelectStaffView(view) => {
                let effects = pages.staff.select(state, view);
                ctx.effects.extend(effects);
            }
            Intent::UpdateDraft(draft) => pages.staff.update_draft(draft),
            Intent::SaveEvent => {
                let effect = pages.staff.save(state);
                ctx.queue(effect);
            }
        }
    }

    /// Apply the result of a finished job.
    pub fn apply(&mut self, outcome: Outcome) {
        let ctx = &mut self.ctx;
        match outcome {
            Outcome::Events { generation, result } => {
                if let Some(events) = ctx.pages.events.finish_load(generation, result) {
                    ctx.store.state_mut().events = events;
                }
            }
            Outcome::Bookings { generation, result } => {
                ctx.pages.bookings.finish_bookings(generation, result);
            }
            Outcome::Waitlist { generation, result } => {
                ctx.pages.bookings.finish_waitlist(generation, result);
            }
            Outcome::Preferences { generation, result } => {
                ctx.pages.preferences.finish_load(generation, result);
            }
            Outcome::ReferenceData { generation, result } => {
                ctx.pages.staff.finish_reference(generation, result);
            }
            Outcome::StaffBookings { generation, result } => {
                ctx.pages.staff.finish_bookings(generation, result);
            }
            Outcome::SignedIn { view, result } => {
                if let Some(response) = ctx.pages.auth.finish(view, result) {
                    self.sign_in(response);
                }
            }
            Outcome::CheckedOut { booked, result } => {
                let state = ctx.store.state();
                if ctx.pages.cart.finish_checkout(state, &booked, result, None) {
                    self.checked_out();
                    self.go_to(Route::Bookings);
                } else if !booked.is_empty() {
                    ctx.reload_events();
                }
            }
            Outcome::GuestCheckedOut {
                info,
                booked,
                result,
            } => {
                let state = ctx.store.state();
                if ctx
                    .pages
                    .cart
                    .finish_checkout(state, &booked, result, Some(&info))
                {
                    let result = ctx.store.save_guest_info(Some(info));
                    ctx.persisted(result);
                    self.checked_out();
                } else if !booked.is_empty() {
                    ctx.reload_events();
                }
            }
            Outcome::BookingCancelled(result) => match result {
                Ok(()) => {
                    log::info!("booking cancelled");
                    ctx.pages.bookings.status = Some(Notice::success("Booking cancelled."));
                    ctx.reload_bookings();
                    ctx.reload_events();
                }
                Err(err) => self.action_failed(&err),
            },
            Outcome::WaitlistJoined { event_id, result } => {
                let state = ctx.store.state();
                if ctx.pages.events.waitlist_joined(state, event_id, result) {
                    ctx.reload_events();
                }
            }
            Outcome::WaitlistLeft(result) => match result {
                Ok(()) => {
                    log::info!("left waitlist");
                    ctx.pages.bookings.status = Some(Notice::success("Removed from the waitlist."));
                    ctx.reload_bookings();
                }
                Err(err) => self.action_failed(&err),
            },
            Outcome::PreferencesSaved(result) => ctx.pages.preferences.finish_save(result),
            Outcome::EventSaved { id, result } => {
                if ctx.pages.staff.finish_save(id, result) {
                    ctx.reload_events();
                }
            }
            Outcome::Document {
                booking_id,
                kind,
                result,
            } => match result {
                Ok(bytes) => {
                    log::debug!("downloaded {} byte(s) for booking {booking_id}", bytes.len());
                    ctx.download = Some(Download {
                        file_name: kind.file_name(booking_id),
                        bytes,
                    });
                }
                Err(err) => self.action_failed(&err),
            },
        }
    }

    fn action_failed(&mut self, err: &ApiError) {
        log::warn!("booking action failed: {err}");
        if err.is_unauthorized() {
            self.sign_out();
            return;
        }
        self.ctx.pages.bookings.action_failed(err);
    }

    fn sign_in(&mut self, response: AuthResponse) {
        let AuthResponse { token, user } = response;
        log::info!("signed in as {}", user.email);
        let result = self
            .ctx
            .store
            .set_auth_state(Some(AuthSession { token, user }));
        self.ctx.persisted(result);
        self.ctx.reload_events();
        self.go_to(Route::Bookings);
    }

    fn sign_out(&mut self) {
        let ctx = &mut self.ctx;
        let result = ctx.store.set_auth_state(None);
        ctx.persisted(result);
        ctx.pages.bookings.clear();
        ctx.pages.preferences = Default::default();
        ctx.pages.staff = Default::default();
        ctx.pages.auth.select(AuthView::Login);
        log::info!("signed out");
        self.go_to(Route::Home);
    }

    fn add_to_cart(&mut self, event_id: u64) {
        let ctx = &mut self.ctx;
        let Some(event) = ctx
            .store
            .state()
            .events
            .iter()
            .find(|event| event.id == event_id)
            .cloned()
        else {
            log::warn!("event {event_id} is not in the current listing");
            ctx.pages.events.notice = Some(Notice::error("This event is no longer available."));
            return;
        };
        match ctx.store.state_mut().cart.add_event(&event) {
            Ok(outcome) => {
                log::debug!("added event {event_id} to cart: {outcome:?}");
                ctx.save_cart();
                self.go_to(Route::Cart);
            }
            Err(err) => ctx.pages.events.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn edit_event(&mut self, event_id: u64) {
        if !self.ctx.store.state().is_staff() {
            return;
        }
        self.ctx.pages.staff.request_edit(event_id);
        if self.router.is_active(Route::Staff.path()) {
            let state = self.ctx.store.state();
            self.ctx.pages.staff.open_pending_edit(state);
        } else {
            self.router.navigate_to(Route::Staff.path(), false);
        }
    }

    fn cart_edited(&mut self, result: Result<(), CartError>) {
        match result {
            Ok(()) => self.ctx.save_cart(),
            Err(err) => {
                log::warn!("cart edit rejected: {err}");
                self.ctx.pages.cart.status = Some(Notice::error(err.to_string()));
            }
        }
    }

    fn checked_out(&mut self) {
        let ctx = &mut self.ctx;
        log::info!("checkout complete");
        ctx.store.state_mut().cart.clear();
        ctx.save_cart();
        ctx.reload_events();
    }
}

impl<S: KeyValueStore + 'static> Storefront<S, MemoryHistory> {
    /// Follow queued location changes until the location stops moving.
    ///
    /// Returns the number of navigations handled.
    pub fn settle(&mut self) -> usize {
        let mut hops = 0;
        while self.router.history().take_change() {
            if hops == MAX_HOPS {
                log::warn!("navigation did not settle after {MAX_HOPS} hops");
                break;
            }
            self.handle_location_change();
            hops += 1;
        }
        hops
    }

    /// Run queued jobs against `api` until nothing is left to do.
    pub async fn run_until_idle<A: BookingApi + ?Sized>(&mut self, api: &A) {
        loop {
            self.settle();
            let jobs = self.take_jobs();
            if jobs.is_empty() {
                break;
            }
            for job in jobs {
                let outcome = job.run(api).await;
                self.apply(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventSummary, User};
    use crate::shell::Section;
    use crate::storage::MemoryStore;

    fn storefront(fragment: &str) -> (Storefront<MemoryStore, MemoryHistory>, Rc<MemoryHistory>) {
        let history = Rc::new(MemoryHistory::with_fragment(fragment));
        let storefront = Storefront::new(MemoryStore::new(), Rc::clone(&history));
        (storefront, history)
    }

    fn event(id: u64, capacity: u32, spots_left: u32) -> EventSummary {
        EventSummary {
            id,
            title: format!("Event {id}"),
            capacity,
            spots_left: Some(spots_left),
            ..EventSummary::default()
        }
    }

    #[test]
    fn start_reveals_home_without_requests() {
        let (mut app, _history) = storefront("");
        app.start();
        assert_eq!(app.shell().visible(), Some(Section::Home));
        assert!(app.take_jobs().is_empty());
    }

    #[test]
    fn guarded_route_redirects_to_login() {
        let (mut app, history) = storefront("#/staff");
        app.start();
        assert_ne!(app.shell().visible(), Some(Section::Staff));
        app.settle();
        assert_eq!(history.fragment(), "#/auth");
        assert_eq!(app.shell().visible(), Some(Section::Auth));
        assert_eq!(app.pages().auth.view, AuthView::Login);
        assert!(app.take_jobs().is_empty());
    }

    #[test]
    fn bookings_route_shows_without_session_or_requests() {
        let (mut app, history) = storefront("#/bookings");
        app.start();
        app.settle();
        assert_eq!(history.fragment(), "#/bookings");
        assert_eq!(app.shell().visible(), Some(Section::Bookings));
        assert!(app.take_jobs().is_empty());
    }

    #[test]
    fn events_route_queues_anonymous_load() {
        let (mut app, _history) = storefront("#/events");
        app.start();
        let jobs = app.take_jobs();
        assert!(matches!(
            jobs.as_slice(),
            [Job {
                effect: Effect::LoadEvents { .. },
                token: None
            }]
        ));
    }

    #[test]
    fn sold_out_event_stays_out_of_cart() {
        let (mut app, history) = storefront("#/events");
        app.start();
        app.ctx.store.state_mut().events = vec![event(1, 10, 0)];
        app.dispatch(Intent::AddToCart(1));
        assert!(app.state().cart.is_empty());
        assert!(
            app.pages()
                .events
                .notice
                .as_ref()
                .is_some_and(Notice::is_error)
        );
        assert_eq!(history.fragment(), "#/events");
    }

    #[test]
    fn adding_an_event_persists_and_opens_cart() {
        let storage = MemoryStore::new();
        let history = Rc::new(MemoryHistory::with_fragment("#/events"));
        let mut app = Storefront::new(storage.clone(), Rc::clone(&history));
        app.start();
        app.ctx.store.state_mut().events = vec![event(4, 10, 8)];
        app.dispatch(Intent::AddToCart(4));
        app.settle();
        assert_eq!(app.shell().visible(), Some(Section::Cart));
        assert_eq!(app.state().cart.len(), 1);
        assert!(storage.raw(crate::state::CART_KEY).is_some());
    }

    #[test]
    fn jobs_carry_the_session_token() {
        let (mut app, _history) = storefront("");
        app.start();
        app.ctx
            .store
            .set_auth_state(Some(AuthSession {
                token: String::from("tok"),
                user: User::default(),
            }))
            .unwrap();
        app.dispatch(Intent::RefreshBookings);
        let jobs = app.take_jobs();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| job.token.as_deref() == Some("tok")));
    }

    #[test]
    fn unauthorized_action_signs_out() {
        let (mut app, history) = storefront("");
        app.start();
        app.ctx
            .store
            .set_auth_state(Some(AuthSession {
                token: String::from("expired"),
                user: User::default(),
            }))
            .unwrap();
        app.apply(Outcome::BookingCancelled(Err(ApiError::Status {
            status: 401,
            message: String::from("Unauthorized"),
        })));
        assert!(!app.state().is_authenticated());
        assert_eq!(app.shell().visible(), Some(Section::Home));
        assert!(!history.take_change());
    }
}
