use super::{check_field, on_submit, text_field};
use crate::components::{Loading, StatusLine, loading};
use delapre_core::pages::PreferencesPage;
use delapre_core::Intent;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct PreferencesViewProps {
    pub page: PreferencesPage,
    pub on_intent: Callback<Intent>,
}

#[function_component(PreferencesView)]
pub fn preferences_view(p: &PreferencesViewProps) -> Html {
    let form = &p.page.form;
    let emit = p.on_intent.reform(Intent::UpdatePreferences);
    let sms_available = form.sms_available();
    html! {
        <div class="preferences-view">
            <h1>{ "Notification preferences" }</h1>
            <Loading label="Loading preferences..." ..loading::Props::from_state(p.page.current.state()) />
            <form id="preferencesForm" onsubmit={on_submit(&p.on_intent, Intent::SavePreferences)}>
                <label for="prefPhone">{ "Mobile number" }</label>
                <input
                    id="prefPhone"
                    type="tel"
                    placeholder="07700 900123"
                    value={form.phone.clone()}
                    oninput={text_field(form, emit.clone(), |form, value| form.phone = value)}
                />
                <label class="check">
                    <input
                        id="prefEmail"
                        type="checkbox"
                        checked={form.email_opt_in}
                        onchange={check_field(form, emit.clone(), |form, on| form.email_opt_in = on)}
                    />
                    { "Email me about my bookings and new events" }
                </label>
                <label class={classes!("check", (!sms_available).then_some("check-disabled"))}>
                    <input
                        id="prefSms"
                        type="checkbox"
                        checked={form.sms_opt_in}
                        disabled={!sms_available}
                        onchange={check_field(form, emit, |form, on| form.sms_opt_in = on)}
                    />
                    { "Send me text reminders" }
                </label>
                if !sms_available {
                    <p class="hint">{ "Add a mobile number to receive text reminders." }</p>
                }
                <button type="submit" class="btn btn-primary" disabled={p.page.saving}>
                    { "Save preferences" }
                </button>
            </form>
            <StatusLine notice={p.page.status.clone()} />
        </div>
    }
}
