//! # Echelon - Framework Instance
//!
//! Holds the process-wide pieces every request context needs: the optional template
//! renderer, the HTTP error handler and the application config. It is built once
//! before serving starts and shared through an `Arc`.
//!
//! ```rust,ignore
//! let app = Echelon::builder()
//!     .renderer(Templates::new().register("hello", hello))
//!     .config(AppConfig::from_file("echelon.toml")?)
//!     .build();
//!
//! // per request, from the transport layer:
//! let mut ctx = app.context_from_body(req).await?;
//! ```

use bytes::Bytes;
use echelon_core::AppConfig;
use http::{Request, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Limited};
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{BoxError, HttpError};
use crate::render::Renderer;
use crate::response::TEXT_PLAIN_UTF_8;

/// Converts an [`HttpError`] into a response on the given context.
pub type ErrorHandler = Arc<dyn Fn(HttpError, &mut Context) + Send + Sync>;

pub struct Echelon {
    renderer: Option<Arc<dyn Renderer>>,
    error_handler: ErrorHandler,
    config: AppConfig,
}

impl Echelon {
    /// A framework instance with default config, no renderer and the default error handler.
    pub fn new() -> Arc<Self> {
        Self::builder().build()
    }

    pub fn builder() -> EchelonBuilder {
        EchelonBuilder::default()
    }

    pub fn renderer(&self) -> Option<&Arc<dyn Renderer>> {
        self.renderer.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Create a context for a request whose body is already buffered.
    pub fn context(self: &Arc<Self>, request: Request<Bytes>) -> Context {
        Context::new(request, Arc::clone(self))
    }

    /// Collect the request body, up to `body_limit` bytes, and create a context.
    ///
    /// An oversized body fails with `413 Payload Too Large`, any other body error with
    /// `400 Bad Request`.
    pub async fn context_from_body<B>(
        self: &Arc<Self>,
        request: Request<B>,
    ) -> Result<Context, HttpError>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        let limit = self.config.body_limit;

        let bytes = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                if err.is::<http_body_util::LengthLimitError>() {
                    tracing::warn!(limit, "Request body exceeds limit");
                    return Err(HttpError::new(StatusCode::PAYLOAD_TOO_LARGE).with_source(err));
                }
                return Err(HttpError::with_message(
                    StatusCode::BAD_REQUEST,
                    "failed to read request body",
                )
                .with_source(err));
            }
        };

        Ok(self.context(Request::from_parts(parts, bytes)))
    }

    pub(crate) fn handle_error(&self, err: HttpError, ctx: &mut Context) {
        (self.error_handler)(err, ctx)
    }
}

impl fmt::Debug for Echelon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Echelon")
            .field("renderer", &self.renderer.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Echelon`].
pub struct EchelonBuilder {
    renderer: Option<Arc<dyn Renderer>>,
    error_handler: ErrorHandler,
    config: AppConfig,
}

impl Default for EchelonBuilder {
    fn default() -> Self {
        Self {
            renderer: None,
            error_handler: Arc::new(default_error_handler),
            config: AppConfig::default(),
        }
    }
}

impl EchelonBuilder {
    pub fn renderer(mut self, renderer: impl Renderer) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Share an already boxed renderer between several instances.
    pub fn shared_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(HttpError, &mut Context) + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Arc<Echelon> {
        Arc::new(Echelon {
            renderer: self.renderer,
            error_handler: self.error_handler,
            config: self.config,
        })
    }
}

/// Writes the status and message as plain text, unless the response is already committed.
pub fn default_error_handler(err: HttpError, ctx: &mut Context) {
    if ctx.response().is_committed() {
        tracing::error!(
            request_id = %ctx.request_id(),
            error = %err,
            "Error raised after response was committed"
        );
        return;
    }

    if err.status.is_server_error() {
        tracing::error!(request_id = %ctx.request_id(), error = ?err, "Request failed");
    } else {
        tracing::debug!(request_id = %ctx.request_id(), error = %err, "Request rejected");
    }

    let body = err.message.into_bytes();
    let content_type = http::HeaderValue::from_static(TEXT_PLAIN_UTF_8);
    if let Err(e) = ctx.response_mut().send(err.status, content_type, &body) {
        tracing::error!(error = %e, "Failed to write error response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Templates;
    use http::header::CONTENT_TYPE;
    use http_body_util::Full;

    #[test]
    fn test_builder_defaults() {
        let app = Echelon::new();
        assert!(app.renderer().is_none());
        assert_eq!(app.config(), &AppConfig::default());
    }

    #[test]
    fn test_builder_with_renderer() {
        let app = Echelon::builder()
            .renderer(Templates::new())
            .config(AppConfig {
                max_params: 2,
                ..AppConfig::default()
            })
            .build();
        assert!(app.renderer().is_some());
        assert_eq!(app.config().max_params, 2);
        assert_eq!(
            format!("{app:?}"),
            format!("Echelon {{ renderer: true, config: {:?} }}", app.config())
        );
    }

    #[test]
    fn test_shared_renderer() {
        let renderer: Arc<dyn Renderer> = Arc::new(Templates::new().register("hello", |out, _| {
            out.write_all(b"hi")?;
            Ok(())
        }));
        let first = Echelon::builder()
            .shared_renderer(Arc::clone(&renderer))
            .build();
        let second = Echelon::builder()
            .shared_renderer(Arc::clone(&renderer))
            .build();

        assert!(Arc::ptr_eq(first.renderer().unwrap(), &renderer));
        assert!(Arc::ptr_eq(second.renderer().unwrap(), &renderer));

        let mut ctx = second.context(Request::new(Bytes::new()));
        ctx.render(StatusCode::OK, "hello", &()).unwrap();
        assert_eq!(ctx.response().body(), b"hi");
    }

    #[tokio::test]
    async fn test_context_from_body() {
        let app = Echelon::new();
        let req = Request::post("/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(br#"{"name":"Joe"}"#)))
            .unwrap();

        let mut ctx = app.context_from_body(req).await.unwrap();
        let value: serde_json::Value = ctx.bind().unwrap();
        assert_eq!(value["name"], "Joe");
    }

    #[tokio::test]
    async fn test_context_from_body_over_limit() {
        let app = Echelon::builder()
            .config(AppConfig {
                body_limit: 4,
                ..AppConfig::default()
            })
            .build();
        let req = Request::post("/")
            .body(Full::new(Bytes::from_static(b"too large")))
            .unwrap();

        let err = app.context_from_body(req).await.unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_default_error_handler_writes_text() {
        let app = Echelon::new();
        let mut ctx = app.context(Request::new(Bytes::new()));

        ctx.error(HttpError::new(StatusCode::NOT_FOUND));

        let res = ctx.response();
        assert!(res.is_committed());
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF_8);
        assert_eq!(res.body(), b"Not Found");
    }

    #[test]
    fn test_default_error_handler_keeps_committed_response() {
        let app = Echelon::new();
        let mut ctx = app.context(Request::new(Bytes::new()));
        ctx.string(StatusCode::OK, "done").unwrap();

        ctx.error(HttpError::new(StatusCode::BAD_GATEWAY));

        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert_eq!(ctx.response().body(), b"done");
    }

    #[test]
    fn test_custom_error_handler() {
        let app = Echelon::builder()
            .error_handler(|err, ctx| {
                let body = serde_json::json!({ "message": err.message });
                let _ = ctx.json(err.status, &body);
            })
            .build();
        let mut ctx = app.context(Request::new(Bytes::new()));

        ctx.error(HttpError::with_message(StatusCode::FORBIDDEN, "nope"));

        assert_eq!(ctx.response().status(), StatusCode::FORBIDDEN);
        assert_eq!(ctx.response().body(), br#"{"message":"nope"}"#);
    }
}
