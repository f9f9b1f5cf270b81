//! Section views
//!
//! Each view renders one page controller's sub-state and reports user input as
//! [`delapre_core::Intent`]s. Views never touch storage or the network.

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod events;
pub mod home;
pub mod preferences;
pub mod staff;

use crate::dom;
use delapre_core::Intent;
use yew::prelude::*;

/// Emit `intent` on click.
pub fn on_click(on_intent: &Callback<Intent>, intent: Intent) -> Callback<MouseEvent> {
    let on_intent = on_intent.clone();
    Callback::from(move |_| on_intent.emit(intent.clone()))
}

/// Emit `intent` on submit instead of letting the browser post the form.
pub fn on_submit(on_intent: &Callback<Intent>, intent: Intent) -> Callback<SubmitEvent> {
    let on_intent = on_intent.clone();
    Callback::from(move |e: SubmitEvent| {
        e.prevent_default();
        on_intent.emit(intent.clone());
    })
}

/// Edit one text field of a form value and emit the whole updated value.
pub fn text_field<T: Clone + 'static>(
    value: &T,
    emit: Callback<T>,
    apply: fn(&mut T, String),
) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(text) = dom::input_value(&e) {
            let mut next = value.clone();
            apply(&mut next, text);
            emit.emit(next);
        }
    })
}

/// Like [`text_field`], for selects and date pickers that report on change.
pub fn choice_field<T: Clone + 'static>(
    value: &T,
    emit: Callback<T>,
    apply: fn(&mut T, String),
) -> Callback<Event> {
    let value = value.clone();
    Callback::from(move |e: Event| {
        if let Some(text) = dom::input_value(&e) {
            let mut next = value.clone();
            apply(&mut next, text);
            emit.emit(next);
        }
    })
}

pub fn check_field<T: Clone + 'static>(
    value: &T,
    emit: Callback<T>,
    apply: fn(&mut T, bool),
) -> Callback<Event> {
    let value = value.clone();
    Callback::from(move |e: Event| {
        if let Some(checked) = dom::checkbox_checked(&e) {
            let mut next = value.clone();
            apply(&mut next, checked);
            emit.emit(next);
        }
    })
}
