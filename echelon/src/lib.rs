// Re-export core modules
pub use echelon_core::config;
pub use echelon_core::params;
pub use echelon_core::store;
pub use echelon_core::telemetry;

// Re-export the request context
pub use echelon_http::{app, bind, context, error, render, response};

pub use echelon_core::{AppConfig, ConfigError, Params, Store};
pub use echelon_http::{
    BindError, BodyFormat, BoxError, Context, Echelon, EchelonBuilder, HttpError, RedirectError,
    RenderError, Renderer, Response, ResponseError, Templates,
};

pub mod prelude {
    pub use crate::{
        AppConfig, BindError, Context, Echelon, HttpError, Params, RedirectError, RenderError,
        Renderer, Templates,
    };

    // Re-export common types users will need
    pub use bytes::Bytes;
    pub use http::{Method, Request, StatusCode};
    pub use http_body_util::Full;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}
