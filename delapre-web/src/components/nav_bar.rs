use delapre_core::Route;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub active: Option<Route>,
    pub signed_in: bool,
    pub is_staff: bool,
    #[prop_or_default]
    pub user_name: Option<AttrValue>,
    /// Number of cart lines shown on the badge
    pub cart_count: usize,
    pub on_sign_out: Callback<()>,
}

fn link(route: Route, label: &str, active: Option<Route>) -> Html {
    let is_active = active == Some(route);
    let class = classes!("nav-link", is_active.then_some("active"));
    let current = is_active.then_some("page");
    html! {
        <a href={route.href()} class={class} aria-current={current}>{ label.to_string() }</a>
    }
}

#[function_component(NavBar)]
pub fn nav_bar(p: &Props) -> Html {
    let on_sign_out = {
        let cb = p.on_sign_out.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let cart_label = format!("Cart ({})", p.cart_count);
    html! {
        <nav class="navbar" aria-label="Main">
            <a href={Route::Home.href()} class="brand">{ "Delapre Events" }</a>
            <div class="nav-links">
                { link(Route::Events, "Events", p.active) }
                { link(Route::Cart, &cart_label, p.active) }
                if p.signed_in {
                    { link(Route::Bookings, "My Bookings", p.active) }
                    { link(Route::Preferences, "Preferences", p.active) }
                    if p.is_staff {
                        { link(Route::Staff, "Staff", p.active) }
                    }
                    if let Some(name) = p.user_name.clone() {
                        <span class="nav-user">{ name }</span>
                    }
                    <a href="#" class="nav-link" id="signOutLink" onclick={on_sign_out}>{ "Sign out" }</a>
                } else {
                    { link(Route::Auth, "Sign in", p.active) }
                }
            </div>
        </nav>
    }
}
