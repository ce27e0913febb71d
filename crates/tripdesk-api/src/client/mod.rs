//! HTTP client for the trip-booking REST API.
//!
//! Every call sends and accepts JSON. Failures are logged and normalized:
//! non-2xx responses become `HTTP <status>: <body>`, replies carrying
//! `success: false` become [`ApiError::Rejected`] with the server's message.

mod config;
mod reservations;
mod trips;
mod users;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::types::{MessageResponse, Outcome};

pub use config::{ApiSettings, DEFAULT_API_BASE_URL};

/// Client for the REST API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    settings: ApiSettings,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(settings, http))
    }

    /// Use a caller-built `reqwest::Client`; its timeouts take precedence.
    pub fn with_http_client(settings: ApiSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Send and return the response if it is 2xx.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "API call failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = match serde_json::from_str::<Outcome>(&text) {
            Ok(outcome) if !outcome.success && !outcome.message.is_empty() => {
                ApiError::Rejected(outcome.message)
            }
            _ => ApiError::http(status.as_u16(), &text),
        };
        error!(status = status.as_u16(), error = %err, "API call failed");
        Err(err)
    }

    /// Send and decode a JSON body.
    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "API response did not decode");
            ApiError::Parse(e.to_string())
        })
    }

    /// Send and read a `{"message": ...}` reply. A non-JSON body is taken as
    /// the message text.
    async fn message(&self, request: RequestBuilder) -> Result<MessageResponse, ApiError> {
        let response = self.send(request).await?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !is_json {
            return Ok(MessageResponse { message: text });
        }
        serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "API response did not decode");
            ApiError::Parse(e.to_string())
        })
    }
}

/// Turn a decoded `success: false` reply into [`ApiError::Rejected`].
fn accepted<T>(success: bool, message: &str, value: T) -> Result<T, ApiError> {
    if success {
        Ok(value)
    } else {
        error!(message, "API rejected the request");
        Err(ApiError::Rejected(message.to_string()))
    }
}
