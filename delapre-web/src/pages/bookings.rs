use super::on_click;
use crate::components::{Loading, StatusLine, loading};
use delapre_core::format::{format_date_time, format_day, format_time};
use delapre_core::pages::BookingsPage;
use delapre_core::{Booking, BookingScope, DocumentKind, Intent, Route, WaitlistEntry};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct BookingsViewProps {
    pub page: BookingsPage,
    pub signed_in: bool,
    pub on_intent: Callback<Intent>,
}

fn scope_tab(current: BookingScope, scope: BookingScope, label: &str, on_intent: &Callback<Intent>) -> Html {
    let active = current == scope;
    html! {
        <button
            class={classes!("tab", active.then_some("tab-active"))}
            aria-pressed={active.to_string()}
            onclick={on_click(on_intent, Intent::ShowBookings(scope))}
        >
            { label.to_string() }
        </button>
    }
}

fn booking_row(booking: &Booking, scope: BookingScope, on_intent: &Callback<Intent>) -> Html {
    let id = booking.id;
    let guests: Vec<String> = booking
        .guest_names
        .iter()
        .filter(|guest| !guest.name.trim().is_empty())
        .map(|guest| format!("{} ({})", guest.name, guest.kind.label()))
        .collect();
    let can_cancel = scope == BookingScope::Upcoming && !booking.is_cancelled();
    html! {
        <li class={classes!("booking", booking.is_cancelled().then_some("booking-cancelled"))} key={id}>
            <div class="booking-head">
                <h3>{ booking.event.title.clone() }</h3>
                <span class="booking-status">{ booking.status.clone() }</span>
            </div>
            <p>
                { format!("{} {}", format_day(&booking.event.starts_at), format_time(&booking.event.starts_at)) }
                { format!(" · {} guest(s)", booking.guest_count) }
            </p>
            if !guests.is_empty() {
                <p class="booking-guests">{ guests.join(", ") }</p>
            }
            if let Some(code) = booking.confirmation_code.clone() {
                <p class="booking-code">{ format!("Confirmation: {code}") }</p>
            }
            if let Some(booked_at) = booking.booked_at.as_deref() {
                <p class="booking-date">{ format!("Booked {}", format_date_time(booked_at)) }</p>
            }
            <div class="booking-actions">
                <button
                    class="btn btn-small"
                    onclick={on_click(on_intent, Intent::Download { booking_id: id, kind: DocumentKind::Confirmation })}
                >
                    { "Confirmation" }
                </button>
                <button
                    class="btn btn-small"
                    onclick={on_click(on_intent, Intent::Download { booking_id: id, kind: DocumentKind::Receipt })}
                >
                    { "Receipt" }
                </button>
                if can_cancel {
                    <button class="btn btn-small btn-danger" onclick={on_click(on_intent, Intent::CancelBooking(id))}>
                        { "Cancel booking" }
                    </button>
                }
            </div>
        </li>
    }
}

fn waitlist_row(entry: &WaitlistEntry, on_intent: &Callback<Intent>) -> Html {
    let title = entry
        .event
        .as_ref()
        .map_or_else(|| format!("Event {}", entry.event_id), |event| event.title.clone());
    html! {
        <li class="waitlist-entry" key={entry.id}>
            <span>{ title }</span>
            <span>{ format!("{} place(s)", entry.requested_spots) }</span>
            if !entry.status.is_empty() {
                <span class="waitlist-status">{ entry.status.clone() }</span>
            }
            <button class="btn btn-small" onclick={on_click(on_intent, Intent::LeaveWaitlist(entry.id))}>
                { "Leave waitlist" }
            </button>
        </li>
    }
}

#[function_component(BookingsView)]
pub fn bookings_view(p: &BookingsViewProps) -> Html {
    if !p.signed_in {
        return html! {
            <div class="bookings-view">
                <h1>{ "My bookings" }</h1>
                <p>
                    <a href={Route::Auth.href()}>{ "Sign in" }</a>
                    { " to see your bookings." }
                </p>
            </div>
        };
    }
    let page = &p.page;
    let bookings = page.bookings.state().ready().map(|list| {
        if list.is_empty() {
            let message = match page.scope {
                BookingScope::Upcoming => "You have no upcoming bookings.",
                BookingScope::History => "No past bookings yet.",
            };
            return html! { <p class="empty">{ message }</p> };
        }
        html! {
            <ul id="bookingsList" class="bookings">
                { for list.iter().map(|booking| booking_row(booking, page.scope, &p.on_intent)) }
            </ul>
        }
    });
    let waitlist = page
        .waitlist
        .state()
        .ready()
        .filter(|entries| !entries.is_empty())
        .map(|entries| {
            html! {
                <section class="waitlist">
                    <h2>{ "Waitlist" }</h2>
                    <ul>{ for entries.iter().map(|entry| waitlist_row(entry, &p.on_intent)) }</ul>
                </section>
            }
        });

    html! {
        <div class="bookings-view">
            <h1>{ "My bookings" }</h1>
            <div class="tabs" role="group">
                { scope_tab(page.scope, BookingScope::Upcoming, "Upcoming", &p.on_intent) }
                { scope_tab(page.scope, BookingScope::History, "History", &p.on_intent) }
                <button class="btn btn-link" onclick={on_click(&p.on_intent, Intent::RefreshBookings)}>
                    { "Refresh" }
                </button>
            </div>
            <StatusLine notice={page.status.clone()} />
            <Loading label="Loading bookings..." ..loading::Props::from_state(page.bookings.state()) />
            { for bookings }
            { for waitlist }
        </div>
    }
}
