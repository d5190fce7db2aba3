//! Response wrapper with a commit guard.
//!
//! The wrapper buffers the outgoing status, headers and body for one request.
//! The first status write commits it; from then on status and headers are frozen
//! and only the body may grow.

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use std::io;

use crate::error::ResponseError;

pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML_UTF_8: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON_UTF_8: &str = "application/json; charset=utf-8";

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    committed: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            committed: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Set a header before commit.
    pub fn set_header(
        &mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Write the status line and commit the response.
    ///
    /// A second call fails with [`ResponseError::AlreadyCommitted`].
    pub fn write_header(&mut self, status: StatusCode) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.status = status;
        self.committed = true;
        Ok(())
    }

    /// Append to the body, committing with the current status if nothing was written yet.
    pub fn write_body(&mut self, chunk: &[u8]) {
        self.committed = true;
        self.body.extend_from_slice(chunk);
    }

    /// Commit `status` with `content_type` and `body` in one step.
    pub(crate) fn send(
        &mut self,
        status: StatusCode,
        content_type: HeaderValue,
        body: &[u8],
    ) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.headers.insert(CONTENT_TYPE, content_type);
        self.write_header(status)?;
        self.write_body(body);
        Ok(())
    }

    /// Body sink usable with `std::io::Write` consumers.
    ///
    /// The response is committed by the first non-empty write, not by taking the sink.
    pub fn writer(&mut self) -> BodyWriter<'_> {
        BodyWriter { response: self }
    }

    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    fn ensure_open(&self) -> Result<(), ResponseError> {
        if self.committed {
            tracing::warn!(status = %self.status, "Rejected write to committed response");
            return Err(ResponseError::AlreadyCommitted);
        }
        Ok(())
    }
}

/// `std::io::Write` adapter over a [`Response`] body.
#[derive(Debug)]
pub struct BodyWriter<'a> {
    response: &'a mut Response,
}

impl io::Write for BodyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_empty() {
            self.response.write_body(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
