use super::{on_click, on_submit, text_field};
use crate::components::StatusLine;
use crate::dom;
use delapre_core::cart::guest_count_options;
use delapre_core::format::{format_day, format_gbp, format_time};
use delapre_core::pages::CartPage;
use delapre_core::{Cart, CartLine, GuestType, Intent, Route};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct CartViewProps {
    pub cart: Cart,
    pub page: CartPage,
    pub signed_in: bool,
    pub on_intent: Callback<Intent>,
}

fn guest_rows(line: &CartLine, on_intent: &Callback<Intent>) -> Html {
    let event_id = line.event.id;
    let rows = line.guest_names.iter().enumerate().map(|(index, guest)| {
        let on_name = {
            let on_intent = on_intent.clone();
            Callback::from(move |e: InputEvent| {
                if let Some(name) = dom::input_value(&e) {
                    on_intent.emit(Intent::SetGuestName { event_id, index, name });
                }
            })
        };
        let on_kind = {
            let on_intent = on_intent.clone();
            Callback::from(move |e: Event| {
                if let Some(raw) = dom::input_value(&e) {
                    let kind = GuestType::parse_lenient(&raw);
                    on_intent.emit(Intent::SetGuestType { event_id, index, kind });
                }
            })
        };
        html! {
            <div class="guest-row" key={index}>
                <input
                    type="text"
                    placeholder={format!("Guest {} name", index + 1)}
                    value={guest.name.clone()}
                    oninput={on_name}
                />
                <select onchange={on_kind}>
                    { for GuestType::ALL.into_iter().map(|kind| html! {
                        <option value={kind.as_str()} selected={kind == guest.kind}>{ kind.label() }</option>
                    }) }
                </select>
            </div>
        }
    });
    html! { <div class="guest-rows">{ for rows }</div> }
}

fn cart_line(line: &CartLine, on_intent: &Callback<Intent>) -> Html {
    let event_id = line.event.id;
    let on_count = {
        let on_intent = on_intent.clone();
        Callback::from(move |e: Event| {
            if let Some(count) = dom::input_value(&e).and_then(|raw| raw.parse().ok()) {
                on_intent.emit(Intent::SetGuestCount { event_id, count });
            }
        })
    };
    let options = guest_count_options(line.max_guests);
    html! {
        <li class="cart-line" key={event_id} data-event-id={event_id.to_string()}>
            <div class="cart-line-head">
                <h3>{ line.event.title.clone() }</h3>
                <span>{ format!("{} {}", format_day(&line.event.starts_at), format_time(&line.event.starts_at)) }</span>
            </div>
            <label>
                { "Guests " }
                <select class="guest-count" onchange={on_count}>
                    { for options.into_iter().map(|count| html! {
                        <option value={count.to_string()} selected={count == line.guest_count}>{ count }</option>
                    }) }
                </select>
            </label>
            { guest_rows(line, on_intent) }
            <div class="cart-line-foot">
                <span class="line-total">{ format_gbp(line.total_pence()) }</span>
                <button class="btn btn-link" onclick={on_click(on_intent, Intent::RemoveLine(event_id))}>
                    { "Remove" }
                </button>
            </div>
        </li>
    }
}

fn guest_checkout_form(p: &CartViewProps) -> Html {
    let form = &p.page.guest_form;
    let emit = p.on_intent.reform(Intent::UpdateGuestContact);
    html! {
        <form class="guest-checkout" onsubmit={on_submit(&p.on_intent, Intent::GuestCheckout)}>
            <h2>{ "Book as a guest" }</h2>
            <input
                id="guestEmail"
                type="email"
                placeholder="Email"
                value={form.email.clone()}
                oninput={text_field(form, emit.clone(), |info, value| info.email = value)}
            />
            <input
                id="guestName"
                type="text"
                placeholder="Full name"
                value={form.name.clone()}
                oninput={text_field(form, emit.clone(), |info, value| info.name = value)}
            />
            <input
                id="guestPhone"
                type="tel"
                placeholder="Phone (optional)"
                value={form.phone.clone()}
                oninput={text_field(form, emit, |info, value| info.phone = value)}
            />
            <button type="submit" class="btn btn-primary" disabled={p.page.submitting}>
                { "Book as guest" }
            </button>
            <p class="hint">
                { "Have an account? " }
                <a href={Route::Auth.href()}>{ "Sign in" }</a>
                { " to keep your bookings together." }
            </p>
        </form>
    }
}

#[function_component(CartView)]
pub fn cart_view(p: &CartViewProps) -> Html {
    let status = html! { <StatusLine notice={p.page.status.clone()} /> };
    if p.cart.is_empty() {
        return html! {
            <div class="cart-view">
                <h1>{ "Your cart" }</h1>
                { status }
                <p class="empty">{ "Your cart is empty." }</p>
                <a class="btn" href={Route::Events.href()}>{ "Browse events" }</a>
            </div>
        };
    }
    html! {
        <div class="cart-view">
            <h1>{ "Your cart" }</h1>
            { status }
            <ul class="cart-lines">
                { for p.cart.lines.iter().map(|line| cart_line(line, &p.on_intent)) }
            </ul>
            <p class="cart-total">
                { "Total: " }
                <strong>{ format_gbp(p.cart.total_pence()) }</strong>
            </p>
            if p.signed_in {
                <button
                    id="checkoutButton"
                    class="btn btn-primary"
                    disabled={p.page.submitting}
                    onclick={on_click(&p.on_intent, Intent::Checkout)}
                >
                    { "Checkout" }
                </button>
            } else {
                { guest_checkout_form(p) }
            }
        </div>
    }
}
