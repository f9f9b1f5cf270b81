use super::{on_click, on_submit};
use crate::components::{EventCard, Loading, StatusLine, loading};
use crate::dom;
use delapre_core::filter::category_options;
use delapre_core::pages::{EventsPage, WaitlistPrompt};
use delapre_core::{EventSummary, Intent};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct EventsViewProps {
    pub page: EventsPage,
    pub events: Vec<EventSummary>,
    pub signed_in: bool,
    pub is_staff: bool,
    pub on_intent: Callback<Intent>,
}

fn category_label(category: &str) -> String {
    if category == delapre_core::filter::ALL_CATEGORIES {
        return String::from("All categories");
    }
    let mut chars = category.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn waitlist_dialog(
    prompt: &WaitlistPrompt,
    events: &[EventSummary],
    on_intent: &Callback<Intent>,
) -> Html {
    let title = events
        .iter()
        .find(|event| event.id == prompt.event_id)
        .map_or_else(|| String::from("this event"), |event| event.title.clone());
    let on_spots = {
        let on_intent = on_intent.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = dom::input_value(&e) {
                on_intent.emit(Intent::SetWaitlistSpots(value));
            }
        })
    };
    html! {
        <div class="modal" role="dialog" aria-modal="true" aria-labelledby="waitlistTitle">
            <form class="modal-box" onsubmit={on_submit(on_intent, Intent::SubmitWaitlist)}>
                <h2 id="waitlistTitle">{ format!("Join the waitlist for {title}") }</h2>
                <label for="waitlistSpots">{ "How many places do you need?" }</label>
                <input id="waitlistSpots" type="number" min="1" value={prompt.spots.clone()} oninput={on_spots} />
                if let Some(error) = prompt.error.clone() {
                    <p class="field-error" role="alert">{ error }</p>
                }
                <div class="modal-actions">
                    <button type="submit" class="btn btn-primary" disabled={prompt.submitting}>
                        { "Join waitlist" }
                    </button>
                    <button type="button" class="btn" onclick={on_click(on_intent, Intent::CloseWaitlist)}>
                        { "Cancel" }
                    </button>
                </div>
            </form>
        </div>
    }
}

#[function_component(EventsView)]
pub fn events_view(p: &EventsViewProps) -> Html {
    let filter = &p.page.filter;
    let visible = filter.apply(&p.events);

    let on_search = {
        let on_intent = p.on_intent.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = dom::input_value(&e) {
                on_intent.emit(Intent::SetSearch(value));
            }
        })
    };
    let on_category = {
        let on_intent = p.on_intent.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = dom::input_value(&e) {
                on_intent.emit(Intent::SetCategory(value));
            }
        })
    };

    let cards = visible.iter().map(|event| {
        html! {
            <EventCard
                key={event.id}
                event={(*event).clone()}
                signed_in={p.signed_in}
                is_staff={p.is_staff}
                on_intent={p.on_intent.clone()}
            />
        }
    });
    let listing = p.page.listing();
    let empty = !listing.is_loading() && listing.error().is_none() && visible.is_empty();

    html! {
        <div class="events-view">
            <h1>{ "What's on" }</h1>
            <div class="filters">
                <input
                    id="eventSearch"
                    type="search"
                    placeholder="Search events"
                    value={filter.search.clone()}
                    oninput={on_search}
                />
                <select id="categoryFilter" onchange={on_category}>
                    { for category_options(&p.events).into_iter().map(|category| {
                        let selected = category == filter.category;
                        html! {
                            <option value={category.clone()} {selected}>{ category_label(&category) }</option>
                        }
                    }) }
                </select>
            </div>
            <StatusLine notice={p.page.notice.clone()} />
            <Loading label="Loading events..." ..loading::Props::from_state(listing) />
            <div id="eventsGrid" class="events-grid">
                { for cards }
            </div>
            if empty {
                <p class="empty">{ "No events match your search." }</p>
            }
            if let Some(prompt) = p.page.waitlist.as_ref() {
                { waitlist_dialog(prompt, &p.events, &p.on_intent) }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::category_label;

    #[test]
    fn category_labels_are_capitalised() {
        assert_eq!(category_label("all"), "All categories");
        assert_eq!(category_label("tours"), "Tours");
        assert_eq!(category_label(""), "");
    }
}
