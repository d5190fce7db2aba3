//! # Context - Per-Request State
//!
//! One `Context` is created for each inbound request and dropped once its response
//! has been handed to the transport. It is never shared between requests, so none of
//! its stores carry locks.
//!
//! ## Response commit policy
//!
//! The first render, redirect or error write commits the response. Any later attempt
//! to set a status fails with [`ResponseError::AlreadyCommitted`] and leaves the
//! committed response untouched.

use bytes::Bytes;
use echelon_core::{Params, Store};
use http::header::{CONTENT_TYPE, HeaderValue, LOCATION};
use http::request::Parts;
use http::{HeaderMap, Method, Request, StatusCode, Uri};
use http_body_util::Full;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::Echelon;
use crate::bind::BodyFormat;
use crate::error::{BindError, HttpError, RedirectError, RenderError, ResponseError};
use crate::response::{APPLICATION_JSON_UTF_8, Response, TEXT_HTML_UTF_8, TEXT_PLAIN_UTF_8};

pub struct Context {
    request_id: Uuid,
    request: Parts,
    body: Option<Bytes>,
    response: Response,
    params: Params,
    store: Store,
    app: Arc<Echelon>,
}

impl Context {
    pub fn new(request: Request<Bytes>, app: Arc<Echelon>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            request_id: Uuid::new_v4(),
            request: parts,
            body: Some(body),
            response: Response::new(),
            params: Params::with_capacity(app.config().max_params),
            store: Store::new(),
            app,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn uri(&self) -> &Uri {
        &self.request.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    pub fn request_parts(&self) -> &Parts {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn app(&self) -> &Arc<Echelon> {
        &self.app
    }

    // ------------------------------------------------------------------
    // Bind
    // ------------------------------------------------------------------

    /// Deserialize the request body according to its `Content-Type`.
    ///
    /// JSON and URL-encoded forms are supported; any other or missing content type
    /// fails with [`BindError::UnsupportedMediaType`] without consuming the body.
    /// A successful dispatch consumes the body, so a second bind fails with
    /// [`BindError::BodyConsumed`].
    pub fn bind<T: DeserializeOwned>(&mut self) -> Result<T, BindError> {
        let content_type = self
            .request
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let Some(format) = BodyFormat::from_content_type(content_type) else {
            tracing::warn!(
                request_id = %self.request_id,
                content_type,
                "Unsupported media type for bind"
            );
            return Err(BindError::UnsupportedMediaType(content_type.to_string()));
        };

        let body = self.body.take().ok_or(BindError::BodyConsumed)?;
        tracing::debug!(
            request_id = %self.request_id,
            ?format,
            len = body.len(),
            "Binding request body"
        );
        format.decode(&body)
    }

    /// Bind into an existing value, replacing it on success.
    ///
    /// The whole of `target` is overwritten: fields absent from the body do not keep
    /// their previous values. For partial bodies, mark those fields (or the struct)
    /// `#[serde(default)]`. On failure `target` is left as it was.
    pub fn bind_into<T: DeserializeOwned>(&mut self, target: &mut T) -> Result<(), BindError> {
        *target = self.bind()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Path parameters
    // ------------------------------------------------------------------

    /// Replace the path parameters. Called by the router before the handler runs.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Path parameter at position `index`, or `""` when out of range.
    pub fn param_by_index(&self, index: usize) -> &str {
        self.params.by_index(index)
    }

    /// Path parameter named `name`, or `""` when absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.by_name(name)
    }

    // ------------------------------------------------------------------
    // Store
    // ------------------------------------------------------------------

    pub fn set<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        self.store.set(key, value);
    }

    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.store.get(key)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    // ------------------------------------------------------------------
    // Render
    // ------------------------------------------------------------------

    /// Render the template `name` with `data` through the registered renderer.
    ///
    /// The template is executed into a scratch buffer; nothing is written to the
    /// response unless it succeeds.
    pub fn render<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        name: &str,
        data: &T,
    ) -> Result<(), RenderError> {
        let renderer = self.app.renderer().ok_or(RenderError::NoRenderer)?;
        self.ensure_uncommitted()?;

        let data = serde_json::to_value(data).map_err(RenderError::Serialize)?;
        let mut buf = Vec::new();
        renderer
            .render(&mut buf, name, &data)
            .map_err(|source| RenderError::Template {
                name: name.to_string(),
                source,
            })?;

        let content_type = renderer.content_type();
        self.response.send(status, content_type, &buf)?;
        tracing::debug!(
            request_id = %self.request_id,
            %status,
            template = name,
            "Rendered template"
        );
        Ok(())
    }

    /// Serialize `data` as JSON. Indented when `pretty_json` is configured.
    pub fn json<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        data: &T,
    ) -> Result<(), RenderError> {
        self.ensure_uncommitted()?;

        let body = if self.app.config().pretty_json {
            serde_json::to_vec_pretty(data)
        } else {
            serde_json::to_vec(data)
        }
        .map_err(RenderError::Serialize)?;

        self.send(status, APPLICATION_JSON_UTF_8, &body)
    }

    pub fn string(&mut self, status: StatusCode, text: &str) -> Result<(), RenderError> {
        self.send(status, TEXT_PLAIN_UTF_8, text.as_bytes())
    }

    /// Send `markup` as HTML. No escaping is applied.
    pub fn html(&mut self, status: StatusCode, markup: &str) -> Result<(), RenderError> {
        self.send(status, TEXT_HTML_UTF_8, markup.as_bytes())
    }

    /// Commit `status` with an empty body.
    pub fn no_content(&mut self, status: StatusCode) -> Result<(), ResponseError> {
        self.response.write_header(status)
    }

    // ------------------------------------------------------------------
    // Redirect
    // ------------------------------------------------------------------

    /// Redirect to `location`. `status` must be in the 3xx class.
    pub fn redirect(&mut self, status: StatusCode, location: &str) -> Result<(), RedirectError> {
        if !status.is_redirection() {
            return Err(RedirectError::InvalidStatus(status));
        }
        let value = HeaderValue::from_str(location)
            .map_err(|_| RedirectError::InvalidLocation(location.to_string()))?;

        self.response.set_header(LOCATION, value)?;
        self.response.write_header(status)?;
        tracing::debug!(request_id = %self.request_id, %status, location, "Redirecting");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Errors and egress
    // ------------------------------------------------------------------

    /// Pass `err` to the framework's error handler.
    pub fn error(&mut self, err: impl Into<HttpError>) {
        let app = Arc::clone(&self.app);
        app.handle_error(err.into(), self);
    }

    /// Hand the finished response to the transport.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        self.response.into_http()
    }

    fn send(
        &mut self,
        status: StatusCode,
        content_type: &'static str,
        body: &[u8],
    ) -> Result<(), RenderError> {
        self.response
            .send(status, HeaderValue::from_static(content_type), body)?;
        tracing::debug!(request_id = %self.request_id, %status, content_type, "Response committed");
        Ok(())
    }

    fn ensure_uncommitted(&self) -> Result<(), ResponseError> {
        if self.response.is_committed() {
            tracing::warn!(request_id = %self.request_id, "Render on committed response");
            return Err(ResponseError::AlreadyCommitted);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.request.method)
            .field("uri", &self.request.uri)
            .field("params", &self.params)
            .field("store", &self.store)
            .field("committed", &self.response.is_committed())
            .finish()
    }
}
