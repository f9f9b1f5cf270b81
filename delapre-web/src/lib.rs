#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod history;
pub mod pages;
pub mod storage;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(config::log_level()) {
        dom::console_error(&format!("logger unavailable: {err}"));
    }
    yew::Renderer::<app::App>::new().render();
}
