//! HTTP boundary for the open-api driver.
//!
//! The driver builds an [`HttpRequest`] and hands it to an [`HttpTransport`].
//! reqwest only appears behind the `coding` feature, and tests swap in the
//! in-memory [`MockTransport`].

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Methods the driver issues. Open-api actions are always `Post`; `Get`
/// serves raw passthrough downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        })
    }
}

/// Header pairs in wire order. Lookups ignore ASCII case.
pub type HttpHeaders = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Attach a serialized JSON body and its content type.
    #[must_use]
    pub fn with_json(self, body: Vec<u8>) -> Self {
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = body;
        req
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// The open-api treats 300 itself as success.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status > 300
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no scripted response for {method} {url}")]
    Unscripted { method: HttpMethod, url: String },
}

/// One round trip, no retries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(feature = "coding")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "coding")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

    impl From<HttpMethod> for reqwest::Method {
        fn from(method: HttpMethod) -> Self {
            match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            }
        }
    }

    fn classify(url: &str, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
            }
        } else {
            HttpError::Transport(err.to_string())
        }
    }

    /// reqwest-backed transport with a whole-request timeout.
    #[derive(Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let builder = headers
                .iter()
                .fold(self.client.request(method.into(), &url), |b, (k, v)| {
                    b.header(k.as_str(), v.as_str())
                });
            let builder = if body.is_empty() { builder } else { builder.body(body) };

            let resp = builder.send().await.map_err(|e| classify(&url, e))?;
            let status = resp.status().as_u16();
            // Non-UTF-8 header values are never read by the driver.
            let headers = resp
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = resp.bytes().await.map_err(|e| classify(&url, e))?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
pub use self::mock::MockTransport;
