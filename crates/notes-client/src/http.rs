//! Shared HTTP client for the notes API.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "message": "optional", "...": "payload fields" }
//! ```
//!
//! Statuses below 500 are valid answers and are handed back as an
//! [`ApiReply`] for the caller to inspect; only 5xx statuses and network
//! failures become errors here. A 401 is surfaced through
//! [`ApiReply::is_unauthorized`] so callers can force a sign-out.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ClientError, ClientResult};

// ============================================================================
// Envelope
// ============================================================================

/// Payload type for endpoints whose envelope carries nothing beyond
/// `success` and `message`. Also used as an empty JSON request body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: T,
}

/// A parsed API answer with a status below 500.
#[derive(Debug, Clone)]
pub struct ApiReply<T> {
    pub status: StatusCode,
    pub success: bool,
    pub message: Option<String>,
    pub payload: T,
}

impl<T> ApiReply<T> {
    /// Whether the API refused the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The API's message, or `fallback` when it sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Parse a response body into an [`ApiReply`].
///
/// Empty bodies take their success flag from the status. A 401 whose body is
/// not an envelope is read as `{success: false}`.
fn parse_reply<T>(status: StatusCode, body: &[u8]) -> ClientResult<ApiReply<T>>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiReply {
            status,
            success: status.is_success(),
            message: None,
            payload: T::default(),
        });
    }

    match serde_json::from_slice::<Envelope<T>>(body) {
        Ok(envelope) => Ok(ApiReply {
            status,
            success: envelope.success,
            message: envelope.message,
            payload: envelope.payload,
        }),
        Err(_) if status == StatusCode::UNAUTHORIZED => Ok(ApiReply {
            status,
            success: false,
            message: None,
            payload: T::default(),
        }),
        Err(e) => Err(ClientError::MalformedResponse(format!(
            "status {}: {}",
            status.as_u16(),
            e
        ))),
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client bound to one API base URL. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client with the transport defaults.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::build(base_url, reqwest::Client::builder())
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::build(&config.api_url, builder)
    }

    fn build(base_url: &str, builder: reqwest::ClientBuilder) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            name: "NOTES_API_URL".to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                name: "NOTES_API_URL".to_string(),
                reason: format!("{base_url} cannot carry a path"),
            }
            .into());
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(ConfigError::InvalidValue {
                name: "NOTES_API_URL".to_string(),
                reason: "base URL cannot carry a path".to_string(),
            }))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T>(&self, segments: &[&str], token: Option<&str>) -> ClientResult<ApiReply<T>>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::GET, segments, token)?;
        self.send(request).await
    }

    pub async fn delete<T>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> ClientResult<ApiReply<T>>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::DELETE, segments, token)?;
        self.send(request).await
    }

    pub async fn post<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<ApiReply<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::POST, segments, token)?.json(body);
        self.send(request).await
    }

    pub async fn put<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<ApiReply<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::PUT, segments, token)?.json(body);
        self.send(request).await
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, path = url.path(), authenticated = token.is_some(), "API request");

        let mut request = self.http.request(method, url);
        // The API reads the raw token, without a scheme prefix.
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        Ok(request)
    }

    async fn send<T>(&self, request: RequestBuilder) -> ClientResult<ApiReply<T>>
    where
        T: DeserializeOwned + Default,
    {
        let response = request.send().await?;
        let status = response.status();

        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "API server error");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        parse_reply(status, &body)
    }
}
