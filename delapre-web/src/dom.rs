//! Thin wrappers over browser globals.
//!
//! Everything returns `Option`/`Result` so callers decide how to degrade when a
//! global is missing (server-side rendering, tests, locked-down browsers).
use anyhow::{Context, anyhow};
use delapre_core::Download;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Document, Event, HtmlAnchorElement, HtmlInputElement,
    HtmlSelectElement, Storage, Url, Window,
};

#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|window| window.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console, bypassing the logger.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("window unavailable"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

pub fn set_title(title: &str) {
    if let Some(document) = document() {
        document.set_title(title);
    }
}

/// Current value of the input or select that fired `event`.
#[must_use]
pub fn input_value(event: &Event) -> Option<String> {
    let target = event.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<HtmlSelectElement>()
        .map(HtmlSelectElement::value)
}

/// Checked state of the checkbox that fired `event`.
#[must_use]
pub fn checkbox_checked(event: &Event) -> Option<bool> {
    event
        .target()?
        .dyn_ref::<HtmlInputElement>()
        .map(HtmlInputElement::checked)
}

/// Hand downloaded bytes to the browser as a PDF file.
///
/// # Errors
/// Returns an error if the blob, its object URL or the temporary link cannot be created.
pub fn save_download(download: &Download) -> anyhow::Result<()> {
    let document = document().context("document unavailable")?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(download.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| anyhow!("could not create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(&download.file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(js_error)?;
    log::info!("saved {}", download.file_name);
    Ok(())
}

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!(js_error_message(&value))
}
