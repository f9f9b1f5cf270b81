use delapre_web::app::App;
use delapre_web::dom;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use yew::Renderer;

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

/// Let scheduled renders run.
async fn settle() {
    for _ in 0..4 {
        let _ = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await;
    }
}

#[wasm_bindgen_test]
async fn app_mounts_every_section() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    settle().await;
    let doc = dom::document().expect("document");
    for id in [
        "homeSection",
        "eventsSection",
        "bookingsSection",
        "cartSection",
        "authSection",
        "staffSection",
        "preferencesSection",
    ] {
        assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
    }
    let main = doc.get_element_by_id("main").expect("main landmark");
    assert_eq!(main.tag_name(), "MAIN");
}
