use delapre_core::{History, KeyValueStore};
use delapre_web::history::HashHistory;
use delapre_web::storage::BrowserStorage;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn local_storage_keeps_raw_strings() {
    let storage = BrowserStorage;
    storage.set("delapre-test", "[1,2]").expect("write");
    assert_eq!(
        storage.get("delapre-test").expect("read").as_deref(),
        Some("[1,2]")
    );
    storage.remove("delapre-test").expect("remove");
    assert_eq!(storage.get("delapre-test").expect("read"), None);
    storage.remove("delapre-test").expect("removing twice is fine");
}

#[wasm_bindgen_test]
fn pushing_sets_the_fragment() {
    let history = HashHistory;
    history.push("#/events");
    assert_eq!(history.fragment(), "#/events");
    history.push("#/");
    assert_eq!(history.fragment(), "#/");
}
