//! Browser downloads of generated content.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Click a temporary `<a download>` pointing at `href`
fn click_download_link(href: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "document unavailable".to_string())?;
    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "created element is not an anchor".to_string())?;
    anchor.set_href(href);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

/// Offer `content` as a file named `filename`
pub fn download_text(content: &str, filename: &str, mime_type: &str) -> Result<(), String> {
    let parts = Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let result = click_download_link(&url, filename);
    if Url::revoke_object_url(&url).is_err() {
        tracing::debug!(filename, "failed to revoke object url");
    }
    result
}

/// Offer a `data:` URL (e.g. a canvas snapshot) as a file
pub fn download_data_url(data_url: &str, filename: &str) -> Result<(), String> {
    click_download_link(data_url, filename)
}
