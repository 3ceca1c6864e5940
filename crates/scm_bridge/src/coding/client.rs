//! Coding open-api client creation and the request envelope.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::CodingError;
use super::types::{ApiRequest, ApiResponse};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::platform::{Response, strip_null_values};

/// Public Coding open-api endpoint.
pub const DEFAULT_BASE_URL: &str = "https://e.coding.net/open-api";

/// Path segment every open-api base URL ends with.
const API_SEGMENT: &str = "open-api";

const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const USER_AGENT: &str = concat!("scm-bridge/", env!("CARGO_PKG_VERSION"));

/// Coding open-api client.
///
/// Wraps an [`HttpTransport`] with the open-api conventions: token
/// authentication, JSON bodies, the `{"Action": ...}` request envelope and
/// the `{"Response": ...}` answer envelope.
#[derive(Clone)]
pub struct CodingClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    token: String,
}

impl CodingClient {
    /// Create a new Coding client.
    ///
    /// # Arguments
    ///
    /// * `uri` - Base URL (e.g., "https://e.coding.net"); `open-api` is
    ///   appended when missing
    /// * `token` - Personal access token, empty for unauthenticated calls
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = CodingClient::new("https://e.coding.net", "token")?;
    /// assert_eq!(client.base_url().as_str(), "https://e.coding.net/open-api");
    /// ```
    pub fn new(uri: &str, token: &str) -> Result<Self, CodingError> {
        Self::with_timeout(uri, token, DEFAULT_TIMEOUT)
    }

    /// Like [`CodingClient::new`] with a custom request timeout.
    pub fn with_timeout(uri: &str, token: &str, timeout: StdDuration) -> Result<Self, CodingError> {
        let transport =
            ReqwestTransport::with_timeout(timeout).map_err(|e| CodingError::Config(e.to_string()))?;
        Self::new_with_transport(uri, token, Arc::new(transport))
    }

    pub fn new_with_transport(
        uri: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, CodingError> {
        Ok(Self {
            transport,
            base_url: normalize_base_url(uri)?,
            token: token.to_string(),
        })
    }

    /// Client for the public endpoint without a token.
    pub fn default_client() -> Result<Self, CodingError> {
        Self::new(DEFAULT_BASE_URL, "")
    }

    /// Client for the public endpoint with `token`.
    pub fn with_token(token: &str) -> Result<Self, CodingError> {
        Self::new(DEFAULT_BASE_URL, token)
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.to_string()
        } else {
            format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
        }
    }

    /// Send one request and check the status.
    async fn send<In: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        input: Option<&In>,
    ) -> Result<HttpResponse, CodingError> {
        let mut request = HttpRequest::new(method, self.endpoint(path))
            .with_header("Accept", "application/json")
            .with_header("User-Agent", USER_AGENT);
        if !self.token.is_empty() {
            request = request.with_header("Authorization", format!("token {}", self.token));
        }
        if let Some(input) = input {
            request = request.with_json(serde_json::to_vec(input)?);
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| CodingError::Http(e.to_string()))?;

        if response.is_failure() {
            let message = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown Status")
                .to_string();
            return Err(CodingError::Status {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }

    /// Send a request and decode the JSON answer into `Out`.
    ///
    /// Null members are stripped before decoding, so `null` fields take
    /// their defaults.
    pub async fn do_json<In: Serialize + ?Sized, Out: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        input: Option<&In>,
    ) -> Result<(Out, Response), CodingError> {
        let response = self.send(method, path, input).await?;
        let value: serde_json::Value = serde_json::from_slice(&response.body)?;
        let out = serde_json::from_value(strip_null_values(value))?;
        Ok((out, to_response(response)))
    }

    /// Send a request and copy the raw answer body into `sink`.
    pub async fn do_raw<In: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        input: Option<&In>,
        sink: &mut (dyn Write + Send),
    ) -> Result<Response, CodingError> {
        let response = self.send(method, path, input).await?;
        sink.write_all(&response.body).map_err(CodingError::Sink)?;
        Ok(to_response(response))
    }

    /// Invoke an open-api action.
    ///
    /// POSTs `{"Action": action, ...fields}` to the base URL, rejects an
    /// embedded `Error` object even on a 2xx status and stamps the envelope's
    /// `RequestId` onto the returned [`Response`].
    pub async fn call<F: Serialize, P: DeserializeOwned>(
        &self,
        action: &str,
        fields: &F,
    ) -> Result<(P, Response), CodingError> {
        let request = ApiRequest { action, fields };
        let (out, mut res): (ApiResponse<P>, Response) = self
            .do_json(HttpMethod::Post, "", Some(&request))
            .await?;

        let envelope = out.response.ok_or(CodingError::MissingPayload("Response"))?;
        if let Some(error) = envelope.error {
            tracing::debug!(
                action,
                request_id = %envelope.request_id,
                code = %error.code,
                "Open-api action failed"
            );
            return Err(CodingError::Api {
                code: error.code,
                message: error.message,
            });
        }

        tracing::debug!(action, request_id = %envelope.request_id, "Open-api action");
        res.id = envelope.request_id;
        Ok((envelope.payload, res))
    }
}

fn to_response(response: HttpResponse) -> Response {
    Response {
        id: String::new(),
        status: response.status,
        headers: response.headers,
    }
}

/// Parse `uri` and append the `open-api` segment unless the path already
/// ends with it.
pub fn normalize_base_url(uri: &str) -> Result<Url, CodingError> {
    let mut url = Url::parse(uri).map_err(|e| CodingError::Config(format!("{uri}: {e}")))?;
    let path = url.path();
    if !path.ends_with(API_SEGMENT) && !path.ends_with(&format!("{API_SEGMENT}/")) {
        let mut path = path.to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(API_SEGMENT);
        url.set_path(&path);
    }
    Ok(url)
}
