use super::{check_field, choice_field, on_click, on_submit, text_field};
use crate::components::{Loading, StatusLine, loading};
use delapre_core::format::{format_day, format_time, price_tag};
use delapre_core::pages::StaffPage;
use delapre_core::pages::staff::STAFF_ONLY;
use delapre_core::{Booking, EventDraft, EventSummary, Intent, StaffView};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct StaffViewProps {
    pub page: StaffPage,
    pub events: Vec<EventSummary>,
    pub is_staff: bool,
    pub on_intent: Callback<Intent>,
}

const FREQUENCIES: [(&str, &str); 2] = [("weekly", "Weekly"), ("monthly", "Monthly")];

fn dashboard(events: &[EventSummary], on_intent: &Callback<Intent>) -> Html {
    if events.is_empty() {
        return html! { <p class="empty">{ "No events scheduled." }</p> };
    }
    html! {
        <table class="table staff-events">
            <thead>
                <tr>
                    <th>{ "Event" }</th>
                    <th>{ "When" }</th>
                    <th>{ "Price" }</th>
                    <th>{ "Spaces" }</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                { for events.iter().map(|event| html! {
                    <tr key={event.id}>
                        <td>{ event.title.clone() }</td>
                        <td>{ format!("{} {}", format_day(&event.starts_at), format_time(&event.starts_at)) }</td>
                        <td>{ price_tag(event.is_free, event.price_pence()) }</td>
                        <td>{ format!("{} / {}", event.available(), event.capacity) }</td>
                        <td>
                            <button class="btn btn-small" onclick={on_click(on_intent, Intent::EditEvent(event.id))}>
                                { "Edit" }
                            </button>
                        </td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

fn event_form(page: &StaffPage, on_intent: &Callback<Intent>) -> Html {
    let draft = &page.draft;
    let emit = on_intent.reform(Intent::UpdateDraft);
    let text = |apply: fn(&mut EventDraft, String)| text_field(draft, emit.clone(), apply);
    let choice = |apply: fn(&mut EventDraft, String)| choice_field(draft, emit.clone(), apply);
    html! {
        <form id="eventForm" class="event-form" onsubmit={on_submit(on_intent, Intent::SaveEvent)}>
            <h2>{ draft.heading() }</h2>
            <label for="eventCategory">{ "Category" }</label>
            <select id="eventCategory" onchange={choice(|draft, value| draft.category_id = value)}>
                <option value="" selected={draft.category_id.is_empty()}>{ "Choose a category" }</option>
                { for page.categories().iter().map(|category| {
                    let value = category.id.to_string();
                    let selected = value == draft.category_id;
                    html! { <option {value} {selected}>{ category.name.clone() }</option> }
                }) }
            </select>
            <label for="eventTitle">{ "Title" }</label>
            <input id="eventTitle" type="text" value={draft.title.clone()} oninput={text(|draft, value| draft.title = value)} />
            <label for="eventLocation">{ "Location" }</label>
            <input
                id="eventLocation"
                type="text"
                list="eventLocations"
                value={draft.location.clone()}
                oninput={text(|draft, value| draft.location = value)}
            />
            <datalist id="eventLocations">
                { for page.locations().iter().map(|location| html! { <option value={location.name.clone()} /> }) }
            </datalist>
            <div class="field-row">
                <label>
                    { "Start date" }
                    <input id="eventStartDate" type="date" value={draft.start_date.clone()} onchange={choice(|draft, value| draft.start_date = value)} />
                </label>
                <label>
                    { "Start time" }
                    <input id="eventStartTime" type="text" placeholder="HH:MM" value={draft.start_time.clone()} oninput={text(|draft, value| draft.start_time = value)} />
                </label>
            </div>
            <div class="field-row">
                <label>
                    { "End date" }
                    <input id="eventEndDate" type="date" value={draft.end_date.clone()} onchange={choice(|draft, value| draft.end_date = value)} />
                </label>
                <label>
                    { "End time" }
                    <input id="eventEndTime" type="text" placeholder="HH:MM" value={draft.end_time.clone()} oninput={text(|draft, value| draft.end_time = value)} />
                </label>
            </div>
            <label for="eventCapacity">{ "Capacity" }</label>
            <input id="eventCapacity" type="number" min="1" value={draft.capacity.clone()} oninput={text(|draft, value| draft.capacity = value)} />
            <label class="check">
                <input
                    id="eventFree"
                    type="checkbox"
                    checked={draft.is_free}
                    onchange={check_field(draft, emit.clone(), |draft, on| draft.is_free = on)}
                />
                { "Free event" }
            </label>
            <label for="eventPrice">{ "Price (£)" }</label>
            <input
                id="eventPrice"
                type="number"
                min="0"
                step="0.01"
                disabled={draft.is_free}
                value={draft.price.clone()}
                oninput={text(|draft, value| draft.price = value)}
            />
            if !draft.is_editing() {
                <label class="check">
                    <input
                        id="eventRepeat"
                        type="checkbox"
                        checked={draft.repeat}
                        onchange={check_field(draft, emit.clone(), |draft, on| draft.repeat = on)}
                    />
                    { "Repeat this event" }
                </label>
                if draft.repeat {
                    <div class="field-row">
                        <select id="eventFrequency" onchange={choice(|draft, value| draft.repeat_frequency = value)}>
                            { for FREQUENCIES.iter().map(|(value, label)| html! {
                                <option value={*value} selected={draft.repeat_frequency == *value}>{ *label }</option>
                            }) }
                        </select>
                        <label>
                            { "Until" }
                            <input id="eventRepeatUntil" type="date" value={draft.repeat_until.clone()} onchange={choice(|draft, value| draft.repeat_until = value)} />
                        </label>
                    </div>
                }
            }
            <button type="submit" class="btn btn-primary" disabled={page.saving}>{ draft.submit_label() }</button>
        </form>
    }
}

fn staff_bookings(bookings: &[Booking]) -> Html {
    if bookings.is_empty() {
        return html! { <p class="empty">{ "No bookings yet." }</p> };
    }
    html! {
        <table class="table staff-bookings">
            <thead>
                <tr>
                    <th>{ "Event" }</th>
                    <th>{ "Attendee" }</th>
                    <th>{ "Email" }</th>
                    <th>{ "Guests" }</th>
                    <th>{ "Status" }</th>
                </tr>
            </thead>
            <tbody>
                { for bookings.iter().map(|booking| html! {
                    <tr key={booking.id}>
                        <td>{ booking.event.title.clone() }</td>
                        <td>{ booking.attendee_name().unwrap_or_default() }</td>
                        <td>{ booking.attendee_email().unwrap_or_default().to_string() }</td>
                        <td>{ booking.guest_count }</td>
                        <td>{ booking.status.clone() }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

#[function_component(StaffPanel)]
pub fn staff_panel(p: &StaffViewProps) -> Html {
    if !p.is_staff {
        return html! {
            <div class="staff-view">
                <p class="status status-error" role="alert">{ STAFF_ONLY }</p>
            </div>
        };
    }
    let page = &p.page;
    let tab = |view: StaffView, label: &'static str| {
        let active = page.view == view;
        html! {
            <button
                class={classes!("tab", active.then_some("tab-active"))}
                aria-pressed={active.to_string()}
                onclick={on_click(&p.on_intent, Intent::SelectStaffView(view))}
            >
                { label }
            </button>
        }
    };
    let body = match page.view {
        StaffView::Dashboard => dashboard(&p.events, &p.on_intent),
        StaffView::AddEvent => event_form(page, &p.on_intent),
        StaffView::ManageBookings => html! {
            <>
                <Loading label="Loading bookings..." ..loading::Props::from_state(page.bookings.state()) />
                { for page.bookings.state().ready().map(|bookings| staff_bookings(bookings)) }
            </>
        },
    };
    html! {
        <div class="staff-view">
            <h1>{ "Staff" }</h1>
            <div class="tabs" role="group">
                { tab(StaffView::Dashboard, "Events") }
                { tab(StaffView::AddEvent, "Add event") }
                { tab(StaffView::ManageBookings, "Bookings") }
            </div>
            <StatusLine notice={page.status.clone()} />
            <Loading label="Loading categories..." ..loading::Props::from_state(page.reference.state()) />
            { body }
        </div>
    }
}
