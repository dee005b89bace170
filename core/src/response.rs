//! Derived views over a completed `HttpResponse`.
//!
//! # Design
//! Each view re-reads the raw body; nothing is cached, so a failing view
//! leaves the others usable. The API-error check runs before JSON and typed
//! decoding: a non-2xx status, or a 2xx body shaped like the API's error
//! envelope, becomes `Error::Api` rather than a decoding failure.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::HttpResponse;

impl HttpResponse {
    /// Parse the body as JSON without looking at the status.
    pub fn raw_json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decoding(e.to_string()))
    }

    /// The API error this response represents, if any.
    ///
    /// Non-JSON error bodies are reported as a JSON string payload.
    pub fn api_error(&self) -> Option<Error> {
        let parsed = serde_json::from_slice::<Value>(&self.body).ok();
        if !self.is_success() {
            let payload = parsed
                .unwrap_or_else(|| Value::String(String::from_utf8_lossy(&self.body).into_owned()));
            return Some(Error::Api {
                status: self.status,
                payload,
            });
        }
        match parsed {
            Some(payload) if is_error_envelope(&payload) => Some(Error::Api {
                status: self.status,
                payload,
            }),
            _ => None,
        }
    }

    /// JSON view with the API-error check applied.
    pub fn json(&self) -> Result<Value> {
        if let Some(err) = self.api_error() {
            return Err(err);
        }
        self.raw_json()
    }

    /// Typed view with the API-error check applied.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(err) = self.api_error() {
            return Err(err);
        }
        serde_json::from_slice(&self.body).map_err(|e| Error::Decoding(e.to_string()))
    }
}

/// `{"errors": [...]}` without `data` (v1.1 and v2 failures), or a v2
/// problem document carrying `title`, `detail` and `type`.
fn is_error_envelope(payload: &Value) -> bool {
    let Some(object) = payload.as_object() else {
        return false;
    };
    let errors_only =
        object.get("errors").is_some_and(Value::is_array) && !object.contains_key("data");
    let problem = ["title", "detail", "type"]
        .iter()
        .all(|key| object.contains_key(*key));
    errors_only || problem
}
