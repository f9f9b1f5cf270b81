use delapre_core::{Notice, NoticeKind};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub notice: Option<Notice>,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

/// Inline status message for a view.
#[function_component(StatusLine)]
pub fn status_line(p: &Props) -> Html {
    let Some(notice) = p.notice.as_ref() else {
        return html! {};
    };
    let (class, role) = match notice.kind {
        NoticeKind::Info => ("status status-info", "status"),
        NoticeKind::Success => ("status status-success", "status"),
        NoticeKind::Error => ("status status-error", "alert"),
    };
    let dismiss = p.on_dismiss.clone().map(|cb| {
        let onclick = Callback::from(move |_| cb.emit(()));
        html! { <button class="status-dismiss" aria-label="Dismiss" {onclick}>{ "×" }</button> }
    });
    html! {
        <div class={class} role={role}>
            <span>{ notice.message.clone() }</span>
            { for dismiss }
        </div>
    }
}
