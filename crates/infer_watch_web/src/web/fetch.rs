use infer_watch::error::FetchError;
use infer_watch::transport::{decode_body, Transport};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// [`Transport`] over `window.fetch`. No timeout beyond the browser's own.
#[derive(Clone, Copy)]
pub(super) struct FetchTransport;

impl Transport for FetchTransport {
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::network("no window"))?;

        let resp = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| FetchError::network(js_error_message(&e)))?;
        let resp: web_sys::Response = resp
            .dyn_into()
            .map_err(|_| FetchError::network("fetch: unexpected response type"))?;

        if !resp.ok() {
            return Err(FetchError::Status(resp.status()));
        }

        let text = resp
            .text()
            .map_err(|_| FetchError::network("response: text() threw"))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| FetchError::network(js_error_message(&e)))?
            .as_string()
            .ok_or_else(|| FetchError::decode("response body is not text"))?;

        decode_body(&body)
    }
}

fn js_error_message(v: &JsValue) -> String {
    if let Some(e) = v.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    v.as_string()
        .unwrap_or_else(|| "fetch: request failed".to_string())
}
