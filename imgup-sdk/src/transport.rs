// ABOUTME: HTTP transport abstraction with a reqwest backend and a retrying decorator
// ABOUTME: Requests are plain data so they can be rebuilt for every attempt

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{USER_AGENT, timeouts};
use crate::error::UploadError;
use crate::retry::{RetryConfig, retry_fixed};
use crate::Result;

/// One field of a multipart body
#[derive(Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        mime: String,
        data: Bytes,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        mime: impl Into<String>,
        data: Bytes,
    ) -> Self {
        FormPart::File {
            name: name.into(),
            filename: filename.into(),
            mime: mime.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Clone)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    Multipart(Vec<FormPart>),
    Bytes { data: Bytes, content_type: String },
}

/// Transport-agnostic description of an HTTP request
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a text field in a form or multipart body
    pub fn field(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            RequestBody::Multipart(parts) => parts.iter().find_map(|part| match part {
                FormPart::Text { name: key, value } if key == name => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }
}

// Header values and form fields carry credentials, so only their names are shown.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        let body = match &self.body {
            RequestBody::Empty => "empty".to_string(),
            RequestBody::Form(fields) => format!("form({} fields)", fields.len()),
            RequestBody::Multipart(parts) => {
                let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
                format!("multipart({})", names.join(", "))
            }
            RequestBody::Bytes { data, content_type } => {
                format!("bytes({} bytes, {})", data.len(), content_type)
            }
        };
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("body", &body)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// e.g. `HTTP 404 Not Found`
    pub fn status_line(&self) -> String {
        let reason = reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason());
        match reason {
            Some(reason) => format!("HTTP {} {}", self.status, reason),
            None => format!("HTTP {}", self.status),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends a single HTTP request; no retries, no status interpretation
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
            RequestBody::Bytes { data, content_type } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type.as_str())
                .body(data.clone()),
        };

        Ok(builder)
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                filename,
                mime,
                data,
            } => {
                let body = Part::stream_with_length(data.clone(), data.len() as u64)
                    .file_name(filename.clone())
                    .mime_str(mime)?;
                form.part(name.clone(), body)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        log::debug!("{} {}", request.method, request.url);

        let response = self.build(request)?.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        log::debug!("{} responded with {} ({} bytes)", request.url, status, body.len());
        Ok(HttpResponse::new(status, body))
    }
}

/// Decorator that adds per-attempt timeouts, status classification and
/// bounded fixed-delay retries to another transport
pub struct RetryingTransport<T: ?Sized> {
    inner: Arc<T>,
    timeout: Duration,
    retry: RetryConfig,
}

impl<T: HttpTransport + ?Sized> RetryingTransport<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self {
            inner,
            timeout: timeouts::HTTP_REQUEST_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse> {
        retry_fixed(&self.retry, || self.attempt(request)).await
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = match tokio::time::timeout(self.timeout, self.inner.send(request)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(UploadError::network(format!(
                    "request to {} timed out after {}ms",
                    request.url,
                    self.timeout.as_millis()
                )));
            }
        };

        if response.is_success() {
            Ok(response)
        } else {
            Err(UploadError::http_status(
                response.status,
                response.status_line(),
            ))
        }
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for RetryingTransport<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.request(request).await
    }
}
