#[cfg(target_arch = "wasm32")]
use crate::{api::HttpApi, dom, history::HashHistory, storage::BrowserStorage};
#[cfg(target_arch = "wasm32")]
use delapre_core::{Intent, Route, Storefront};
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

pub mod view;

pub use view::{ShellView, ShellViewProps, Snapshot, page_title};

#[cfg(target_arch = "wasm32")]
type SharedStorefront = Rc<RefCell<Storefront<BrowserStorage, HashHistory>>>;

/// Start every queued request and hand over any finished download.
///
/// The storefront is never borrowed across an await; each response is applied
/// and pumped again once it arrives.
#[cfg(target_arch = "wasm32")]
fn pump(storefront: &SharedStorefront, api: &Rc<HttpApi>, refresh: &Callback<()>) {
    let (jobs, download) = {
        let mut storefront = storefront.borrow_mut();
        (storefront.take_jobs(), storefront.take_download())
    };
    if let Some(download) = download
        && let Err(err) = dom::save_download(&download)
    {
        log::error!("could not save {}: {err:#}", download.file_name);
    }
    for job in jobs {
        let storefront = Rc::clone(storefront);
        let api = Rc::clone(api);
        let refresh = refresh.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = job.run(&*api).await;
            storefront.borrow_mut().apply(outcome);
            pump(&storefront, &api, &refresh);
        });
    }
    refresh.emit(());
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let storefront = use_mut_ref(|| Storefront::new(BrowserStorage, Rc::new(HashHistory)));
    let api = use_memo((), |_| HttpApi::default());
    let force_update = use_force_update();
    let refresh = Callback::from(move |()| force_update.force_update());

    {
        let storefront = storefront.clone();
        let api = api.clone();
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            {
                let mut front = storefront.borrow_mut();
                front.on_route_change(|path| dom::set_title(&page_title(Route::from_path(path))));
                front.start();
            }
            pump(&storefront, &api, &refresh);
            let listener = {
                let storefront = storefront.clone();
                HashHistory::listen(move || {
                    storefront.borrow_mut().handle_location_change();
                    pump(&storefront, &api, &refresh);
                })
            };
            move || drop(listener)
        });
    }

    let on_intent = {
        let storefront = storefront.clone();
        let api = api.clone();
        Callback::from(move |intent: Intent| {
            log::debug!("intent: {intent:?}");
            storefront.borrow_mut().dispatch(intent);
            pump(&storefront, &api, &refresh);
        })
    };

    let snapshot = Snapshot::capture(&*storefront.borrow());
    html! { <ShellView {snapshot} {on_intent} /> }
}
