use delapre_core::format::{format_day, format_time, price_tag};
use delapre_core::{EventSummary, Intent};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub event: EventSummary,
    pub signed_in: bool,
    pub is_staff: bool,
    pub on_intent: Callback<Intent>,
}

#[function_component(EventCard)]
pub fn event_card(p: &Props) -> Html {
    let event = &p.event;
    let id = event.id;
    let emit = |intent: Intent| {
        let cb = p.on_intent.clone();
        Callback::from(move |_: MouseEvent| cb.emit(intent.clone()))
    };

    let action = if p.is_staff {
        html! { <button class="btn" onclick={emit(Intent::EditEvent(id))}>{ "Edit" }</button> }
    } else if event.is_sold_out() {
        html! {
            <button class="btn btn-secondary" onclick={emit(Intent::OpenWaitlist(id))}>
                { "Join waitlist" }
            </button>
        }
    } else {
        html! {
            <button class="btn btn-primary" onclick={emit(Intent::AddToCart(id))}>
                { "Add to cart" }
            </button>
        }
    };

    let spots = if event.is_sold_out() {
        String::from("Sold out")
    } else {
        format!("{} spaces left", event.available())
    };
    let time = format_time(&event.starts_at);
    let end = format_time(&event.ends_at);
    let when = match (time.is_empty(), end.is_empty()) {
        (true, _) => format_day(&event.starts_at),
        (false, true) => format!("{} · {time}", format_day(&event.starts_at)),
        (false, false) => format!("{} · {time}–{end}", format_day(&event.starts_at)),
    };

    html! {
        <article class="event-card" data-event-id={id.to_string()}>
            <h3>{ event.title.clone() }</h3>
            <p class="event-when">{ when }</p>
            if !event.location.is_empty() {
                <p class="event-where">{ event.location.clone() }</p>
            }
            if !event.description.is_empty() {
                <p class="event-description">{ event.description.clone() }</p>
            }
            <p class="event-meta">
                <span class="price">{ price_tag(event.is_free, event.price_pence()) }</span>
                <span class="spots">{ spots }</span>
            </p>
            { action }
            if !p.signed_in && event.is_sold_out() {
                <p class="hint">{ "Sign in to join the waitlist." }</p>
            }
        </article>
    }
}
