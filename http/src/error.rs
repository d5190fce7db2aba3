//! Error taxonomy for the request context.
//!
//! Each component returns its own error; [`HttpError`] aggregates them into a
//! status code and message for the framework's error handler.

use http::StatusCode;
use thiserror::Error;

/// Boxed error returned by renderers and carried as an error source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("response already committed")]
    AlreadyCommitted,
}

#[derive(Error, Debug)]
pub enum BindError {
    #[error("unsupported media type: {0:?}")]
    UnsupportedMediaType(String),
    #[error("request body already consumed")]
    BodyConsumed,
    #[error("invalid JSON body: {0}")]
    Json(#[source] serde_json::Error),
    #[error("invalid form body: {0}")]
    Form(#[source] serde_urlencoded::de::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("renderer not registered")]
    NoRenderer,
    #[error("failed to render template {name:?}: {source}")]
    Template {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

#[derive(Error, Debug)]
pub enum RedirectError {
    #[error("invalid redirect status code: {0}")]
    InvalidStatus(StatusCode),
    #[error("invalid redirect location: {0:?}")]
    InvalidLocation(String),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// An error carrying the HTTP status it should be answered with.
#[derive(Error, Debug)]
#[error("{status}: {message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl HttpError {
    /// An error with the canonical reason phrase of `status` as its message.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            source: None,
        }
    }

    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<BindError> for HttpError {
    fn from(err: BindError) -> Self {
        let status = match err {
            BindError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            // Binding twice is a handler bug, not a client error.
            BindError::BodyConsumed => {
                return HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(err);
            }
            _ => StatusCode::BAD_REQUEST,
        };
        HttpError::with_message(status, err.to_string()).with_source(err)
    }
}

impl From<RenderError> for HttpError {
    fn from(err: RenderError) -> Self {
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(err)
    }
}

impl From<RedirectError> for HttpError {
    fn from(err: RedirectError) -> Self {
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(err)
    }
}

impl From<ResponseError> for HttpError {
    fn from(err: ResponseError) -> Self {
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(err)
    }
}
