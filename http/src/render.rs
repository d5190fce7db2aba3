//! Template rendering capability.
//!
//! A [`Renderer`] is registered once on the framework instance and shared by every
//! request. The context hands it a scratch buffer, so a renderer that fails part way
//! through never leaves a half-written response behind.

use http::HeaderValue;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::io;
use thiserror::Error;

use crate::error::BoxError;
use crate::response::TEXT_HTML_UTF_8;

/// Executes named templates against serialized data.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, out: &mut dyn io::Write, name: &str, data: &Value) -> Result<(), BoxError>;

    /// Content type of rendered output.
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(TEXT_HTML_UTF_8)
    }
}

type TemplateFn = Box<dyn Fn(&mut dyn io::Write, &Value) -> Result<(), BoxError> + Send + Sync>;

#[derive(Error, Debug)]
#[error("template {0:?} not found")]
pub struct TemplateNotFound(pub String);

/// A [`Renderer`] backed by named closures.
///
/// ```
/// use echelon_http::render::Templates;
/// use std::io::Write;
///
/// let templates = Templates::new().register("hello", |out, data| {
///     write!(out, "Hello, {}!", data.as_str().unwrap_or("stranger"))?;
///     Ok(())
/// });
/// assert!(templates.contains("hello"));
/// ```
#[derive(Default)]
pub struct Templates {
    templates: HashMap<String, TemplateFn>,
    content_type: Option<HeaderValue>,
}

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: impl Into<String>, template: F) -> Self
    where
        F: Fn(&mut dyn io::Write, &Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.templates.insert(name.into(), Box::new(template));
        self
    }

    /// Override the default `text/html` content type.
    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl Renderer for Templates {
    fn render(&self, out: &mut dyn io::Write, name: &str, data: &Value) -> Result<(), BoxError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateNotFound(name.to_string()))?;
        template(out, data)
    }

    fn content_type(&self) -> HeaderValue {
        self.content_type
            .clone()
            .unwrap_or_else(|| HeaderValue::from_static(TEXT_HTML_UTF_8))
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Templates")
            .field("templates", &names)
            .field("content_type", &self.content_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(out: &mut dyn io::Write, data: &Value) -> Result<(), BoxError> {
        match data {
            Value::String(s) => out.write_all(s.as_bytes())?,
            other => write!(out, "{other}")?,
        }
        Ok(())
    }

    #[test]
    fn test_render_named_template() {
        let templates = Templates::new().register("hello", echo);
        let mut out = Vec::new();
        templates.render(&mut out, "hello", &json!("Joe")).unwrap();
        assert_eq!(out, b"Joe");
    }

    #[test]
    fn test_unknown_template() {
        let templates = Templates::new();
        let mut out = Vec::new();
        let err = templates.render(&mut out, "missing", &Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "template \"missing\" not found");
        assert!(out.is_empty());
    }

    #[test]
    fn test_content_type() {
        let templates = Templates::new();
        assert_eq!(templates.content_type(), TEXT_HTML_UTF_8);

        let templates = templates.with_content_type(HeaderValue::from_static("text/plain"));
        assert_eq!(templates.content_type(), "text/plain");
    }
}
