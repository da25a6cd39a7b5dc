//! The request boundary the pollers suspend on.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::FetchError;

/// Issues `GET` requests and decodes JSON bodies.
///
/// Implementations map a non-2xx status to [`FetchError::Status`], a failed
/// request to [`FetchError::Network`] and a body of the wrong shape to
/// [`FetchError::Decode`].
pub trait Transport {
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<T, FetchError>>;
}

/// Decode a response body once the status has been checked.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    Ok(serde_json::from_str(body)?)
}
