use delapre_core::LoadState;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    #[prop_or(AttrValue::from("Loading..."))]
    pub label: AttrValue,
}

impl Props {
    /// Loading and error flags of a load state.
    #[must_use]
    pub fn from_state<T>(state: &LoadState<T>) -> Self {
        Self {
            loading: state.is_loading(),
            error: state.error().map(|err| AttrValue::from(err.to_string())),
            label: AttrValue::from("Loading..."),
        }
    }
}

#[function_component(Loading)]
pub fn loading(p: &Props) -> Html {
    if let Some(error) = p.error.as_ref() {
        return html! { <p class="load-error" role="alert">{ error.clone() }</p> };
    }
    if p.loading {
        return html! { <p class="loading" aria-busy="true">{ p.label.clone() }</p> };
    }
    html! {}
}
