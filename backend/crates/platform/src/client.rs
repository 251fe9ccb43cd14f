//! Backend REST client
//!
//! Thin JSON client for the blood-bank REST API. Callers get a typed
//! [`ClientError`] that separates "no response" from "bad status" from
//! "unexpected body", so each can be surfaced differently.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client could not be constructed (TLS backend, invalid settings)
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Request was sent but no response arrived
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned {status}")]
    Status {
        status: u16,
        /// The backend's `message` field, when the body carried one
        message: Option<String>,
    },

    /// Body was not the expected JSON shape
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// JSON REST client bound to one base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST `body` as JSON and decode the JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::Network)?;

        decode_response(status, &body)
    }
}

fn decode_response<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, ClientError> {
    if !status.is_success() {
        let message = extract_message(body);
        tracing::debug!(status = status.as_u16(), ?message, "Backend rejected request");
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(body)?)
}

/// Pull a non-empty string `message` field out of a JSON error body.
fn extract_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
