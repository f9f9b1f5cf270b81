use super::on_click;
use delapre_core::{Intent, Route};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct HomePageProps {
    pub signed_in: bool,
    #[prop_or_default]
    pub user_name: Option<AttrValue>,
    pub on_intent: Callback<Intent>,
}

#[function_component(HomePage)]
pub fn home_page(p: &HomePageProps) -> Html {
    let greeting = p
        .user_name
        .as_ref()
        .map_or_else(|| String::from("Welcome to Delapre Events"), |name| format!("Welcome back, {name}"));
    html! {
        <div class="hero" data-testid="home">
            <h1>{ greeting }</h1>
            <p>{ "Tours, talks and family days at Delapre Abbey. Book your place online." }</p>
            <div class="hero-actions">
                <button class="btn btn-primary" onclick={on_click(&p.on_intent, Intent::Navigate(Route::Events))}>
                    { "Browse events" }
                </button>
                if p.signed_in {
                    <button class="btn" onclick={on_click(&p.on_intent, Intent::Navigate(Route::Bookings))}>
                        { "My bookings" }
                    </button>
                } else {
                    <button class="btn" onclick={on_click(&p.on_intent, Intent::Navigate(Route::Auth))}>
                        { "Sign in" }
                    </button>
                }
            </div>
        </div>
    }
}
