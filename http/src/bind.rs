//! Content binder: request body to typed value, dispatched on `Content-Type`.

use serde::de::DeserializeOwned;

use crate::error::BindError;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// Body formats the binder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
}

impl BodyFormat {
    /// Resolve a `Content-Type` value, ignoring parameters such as `charset`.
    ///
    /// Returns `None` for anything other than JSON or URL-encoded forms.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();

        if essence.eq_ignore_ascii_case(APPLICATION_JSON) {
            Some(BodyFormat::Json)
        } else if essence.eq_ignore_ascii_case(APPLICATION_FORM) {
            Some(BodyFormat::Form)
        } else {
            None
        }
    }

    pub fn decode<T: DeserializeOwned>(self, body: &[u8]) -> Result<T, BindError> {
        match self {
            BodyFormat::Json => serde_json::from_slice(body).map_err(BindError::Json),
            BodyFormat::Form => serde_urlencoded::from_bytes(body).map_err(BindError::Form),
        }
    }
}
