use crate::components::{NavBar, StatusLine};
use crate::pages::auth::AuthPanel;
use crate::pages::bookings::BookingsView;
use crate::pages::cart::CartView;
use crate::pages::events::EventsView;
use crate::pages::home::HomePage;
use crate::pages::preferences::PreferencesView;
use crate::pages::staff::StaffPanel;
use delapre_core::{
    ClientState, History, Intent, KeyValueStore, Notice, Pages, Route, Section, Shell, Storefront,
};
use yew::prelude::*;

/// Everything the shell renders, copied out of the storefront after each change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub state: ClientState,
    pub pages: Pages,
    pub shell: Shell,
    pub notice: Option<Notice>,
    pub active: Option<Route>,
}

impl Snapshot {
    #[must_use]
    pub fn capture<S, H>(storefront: &Storefront<S, H>) -> Self
    where
        S: KeyValueStore + 'static,
        H: History + 'static,
    {
        Self {
            state: storefront.state().clone(),
            pages: storefront.pages().clone(),
            shell: storefront.shell().clone(),
            notice: storefront.notice().cloned(),
            active: storefront.current_route(),
        }
    }
}

/// Browser tab title for a route.
#[must_use]
pub fn page_title(route: Option<Route>) -> String {
    let section = match route {
        Some(Route::Home) | None => return String::from("Delapre Events"),
        Some(Route::Events) => "Events",
        Some(Route::Bookings) => "My Bookings",
        Some(Route::Cart) => "Cart",
        Some(Route::Auth) => "Sign in",
        Some(Route::Staff) => "Staff",
        Some(Route::Preferences) => "Preferences",
    };
    format!("Delapre Events - {section}")
}

#[derive(Properties, Clone, PartialEq)]
pub struct ShellViewProps {
    pub snapshot: Snapshot,
    pub on_intent: Callback<Intent>,
}

fn section_body(section: Section, snapshot: &Snapshot, on_intent: &Callback<Intent>) -> Html {
    let state = &snapshot.state;
    let pages = &snapshot.pages;
    let signed_in = state.is_authenticated();
    let is_staff = state.is_staff();
    let on_intent = on_intent.clone();
    match section {
        Section::Home => html! {
            <HomePage
                {signed_in}
                user_name={state.user().map(|user| AttrValue::from(user.display_name()))}
                {on_intent}
            />
        },
        Section::Events => html! {
            <EventsView
                page={pages.events.clone()}
                events={state.events.clone()}
                {signed_in}
                {is_staff}
                {on_intent}
            />
        },
        Section::Bookings => html! {
            <BookingsView page={pages.bookings.clone()} {signed_in} {on_intent} />
        },
        Section::Cart => html! {
            <CartView cart={state.cart.clone()} page={pages.cart.clone()} {signed_in} {on_intent} />
        },
        Section::Auth => html! { <AuthPanel page={pages.auth.clone()} {on_intent} /> },
        Section::Staff => html! {
            <StaffPanel page={pages.staff.clone()} events={state.events.clone()} {is_staff} {on_intent} />
        },
        Section::Preferences => html! {
            <PreferencesView page={pages.preferences.clone()} {on_intent} />
        },
    }
}

/// The page chrome plus every section; only the visible one gets content.
#[function_component(ShellView)]
pub fn shell_view(p: &ShellViewProps) -> Html {
    let snapshot = &p.snapshot;
    let state = &snapshot.state;
    let on_sign_out = p.on_intent.reform(|()| Intent::SignOut);
    let on_dismiss = p.on_intent.reform(|()| Intent::DismissNotice);
    html! {
        <>
            <NavBar
                active={snapshot.active}
                signed_in={state.is_authenticated()}
                is_staff={state.is_staff()}
                user_name={state.user().map(|user| AttrValue::from(user.display_name()))}
                cart_count={state.cart.len()}
                {on_sign_out}
            />
            <StatusLine notice={snapshot.notice.clone()} on_dismiss={Some(on_dismiss)} />
            <main id="main" role="main">
                { for snapshot.shell.sections().map(|(section, visible)| html! {
                    <section id={section.id()} key={section.id()} hidden={!visible}>
                        if visible {
                            { section_body(section, snapshot, &p.on_intent) }
                        }
                    </section>
                }) }
            </main>
        </>
    }
}
