//! # echelon-http
//!
//! The per-request [`Context`] of the Echelon framework: body binding by content
//! type, path parameters, request-scoped storage and response rendering with a
//! single-commit guard.
//!
//! Routing, middleware and the socket transport are not part of this crate. A router
//! builds a context through [`Echelon::context`], fills its path parameters with
//! [`Context::set_params`], runs the handler and sends [`Context::into_response`].

pub mod app;
pub mod bind;
pub mod context;
pub mod error;
pub mod render;
pub mod response;

pub use app::{Echelon, EchelonBuilder, ErrorHandler, default_error_handler};
pub use bind::BodyFormat;
pub use context::Context;
pub use error::{BindError, BoxError, HttpError, RedirectError, RenderError, ResponseError};
pub use render::{Renderer, Templates};
pub use response::{BodyWriter, Response};
