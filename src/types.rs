use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{CourierError, Result};

/// HTTP method of a request descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl Method {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

/// Completed transport exchange, surfaced without status interpretation.
///
/// Any HTTP status — including 4xx and 5xx — lands here; check
/// [`Response::status`] (or [`Response::is_success`]) to decide what to do
/// with it.
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes, `None` when the transport returned zero bytes.
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Interprets the body as UTF-8 text. An absent body reads as `""`.
    pub fn text(&self) -> Result<String> {
        match &self.body {
            None => Ok(String::new()),
            Some(bytes) => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|err| CourierError::Decode(format!("body is not UTF-8: {err}"))),
        }
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let bytes = self
            .body
            .as_deref()
            .ok_or_else(|| CourierError::Decode("response has no body".to_owned()))?;
        serde_json::from_slice(bytes)
            .map_err(|err| CourierError::Decode(format!("invalid JSON body: {err}")))
    }
}
