use super::{on_click, on_submit, text_field};
use crate::components::StatusLine;
use delapre_core::pages::AuthPage;
use delapre_core::{AuthView, Intent};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct AuthViewProps {
    pub page: AuthPage,
    pub on_intent: Callback<Intent>,
}

fn login_form(p: &AuthViewProps) -> Html {
    let form = &p.page.login;
    let emit = p.on_intent.reform(Intent::UpdateLogin);
    html! {
        <form id="loginForm" onsubmit={on_submit(&p.on_intent, Intent::SubmitLogin)}>
            <label for="loginEmail">{ "Email" }</label>
            <input
                id="loginEmail"
                type="email"
                autocomplete="username"
                value={form.email.clone()}
                oninput={text_field(form, emit.clone(), |form, value| form.email = value)}
            />
            <label for="loginPassword">{ "Password" }</label>
            <input
                id="loginPassword"
                type="password"
                autocomplete="current-password"
                value={form.password.clone()}
                oninput={text_field(form, emit, |form, value| form.password = value)}
            />
            <button type="submit" class="btn btn-primary" disabled={p.page.submitting}>
                { "Sign in" }
            </button>
        </form>
    }
}

fn register_form(p: &AuthViewProps) -> Html {
    let form = &p.page.register;
    let emit = p.on_intent.reform(Intent::UpdateRegister);
    html! {
        <form id="registerForm" onsubmit={on_submit(&p.on_intent, Intent::SubmitRegister)}>
            <label for="registerFirstName">{ "First name" }</label>
            <input
                id="registerFirstName"
                type="text"
                value={form.first_name.clone()}
                oninput={text_field(form, emit.clone(), |form, value| form.first_name = value)}
            />
            <label for="registerLastName">{ "Last name" }</label>
            <input
                id="registerLastName"
                type="text"
                value={form.last_name.clone()}
                oninput={text_field(form, emit.clone(), |form, value| form.last_name = value)}
            />
            <label for="registerEmail">{ "Email" }</label>
            <input
                id="registerEmail"
                type="email"
                autocomplete="email"
                value={form.email.clone()}
                oninput={text_field(form, emit.clone(), |form, value| form.email = value)}
            />
            <label for="registerPassword">{ "Password" }</label>
            <input
                id="registerPassword"
                type="password"
                autocomplete="new-password"
                value={form.password.clone()}
                oninput={text_field(form, emit, |form, value| form.password = value)}
            />
            <button type="submit" class="btn btn-primary" disabled={p.page.submitting}>
                { "Create account" }
            </button>
        </form>
    }
}

#[function_component(AuthPanel)]
pub fn auth_panel(p: &AuthViewProps) -> Html {
    let view = p.page.view;
    let tab = |target: AuthView, label: &'static str| {
        let active = view == target;
        html! {
            <button
                class={classes!("tab", active.then_some("tab-active"))}
                aria-pressed={active.to_string()}
                onclick={on_click(&p.on_intent, Intent::SelectAuthView(target))}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="auth-view">
            <div class="tabs" role="group">
                { tab(AuthView::Login, "Sign in") }
                { tab(AuthView::Register, "Register") }
            </div>
            <StatusLine notice={p.page.status.clone()} />
            {
                match view {
                    AuthView::Login => login_form(p),
                    AuthView::Register => register_form(p),
                }
            }
        </div>
    }
}
