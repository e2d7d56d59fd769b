//! HTTP helpers for the JSON REST collections. Resource clients go through
//! these helpers so every request shares one `reqwest::Client`, one user agent
//! and one way of turning transport failures and non-success statuses into
//! `AppError`. Nothing here retries; errors go straight back to the caller.

use crate::{config::AppConfig, errors::AppError};
use reqwest::{Client, Method, Response, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};
use url::Url;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Maximum number of error body characters surfaced to the caller.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client for the configured API base URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Config("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches and decodes JSON.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or undecodable body.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        self.send_json(Method::GET, segments, None).await
    }

    /// Posts a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded, or on any response error.
    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body)?;
        self.send_json(Method::POST, segments, Some(payload)).await
    }

    /// Puts a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded, or on any response error.
    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body)?;
        self.send_json(Method::PUT, segments, Some(payload)).await
    }

    /// Issues a DELETE and passes the server's confirmation through. An empty
    /// success body comes back as `Value::Null`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or a body
    /// that is present but not JSON.
    pub async fn delete_json(&self, segments: &[&str]) -> Result<Value, AppError> {
        let body = self.send(Method::DELETE, segments, None).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        decode(&body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        payload: Option<String>,
    ) -> Result<T, AppError> {
        let body = self.send(method, segments, payload).await?;
        decode(&body)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        payload: Option<String>,
    ) -> Result<Vec<u8>, AppError> {
        let url = self.endpoint(segments)?;

        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );

        let mut request = self.http.request(method, url);
        if let Some(payload) = payload {
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request
            .send()
            .instrument(span.clone())
            .await
            .map_err(map_request_error)?;

        read_response(response).instrument(span).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, AppError> {
    serde_json::to_string(body)
        .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Serialization(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Returns the body of a successful response, or surfaces the HTTP error
/// with a sanitized body.
async fn read_response(response: Response) -> Result<Vec<u8>, AppError> {
    let status = response.status();
    debug!(status = status.as_u16(), "API response");

    if status.is_success() {
        let body = response.bytes().await.map_err(map_request_error)?;
        Ok(body.to_vec())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Trims and truncates HTTP error bodies before they reach the caller.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
