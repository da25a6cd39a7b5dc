//! `reqwest` transport for the headless watcher.

use std::future::Future;
use std::time::Duration;

use infer_watch::error::FetchError;
use infer_watch::transport::{decode_body, Transport};
use serde::de::DeserializeOwned;

/// Upper bound for one request; a newer tick has usually superseded it by then.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("infer_watchd/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;
        decode_body(&body)
    }

    /// Download an image the way a browser `<img>` would, returning its size.
    ///
    /// Fails on a non-2xx status, a non-image content type, or an empty body.
    pub async fn fetch_image(&self, url: &str) -> Result<usize, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(ct) = resp.headers().get(reqwest::header::CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or_default();
            if !ct.starts_with("image/") {
                return Err(FetchError::decode(format!("not an image: {ct}")));
            }
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(FetchError::decode("empty image"));
        }
        Ok(bytes.len())
    }
}

impl Transport for HttpTransport {
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<T, FetchError>> {
        self.fetch_json(url)
    }
}
