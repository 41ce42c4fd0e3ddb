//! Shared HTTP plumbing.
//!
//! Builds the reqwest client from [`ApiSettings`] and turns every outcome
//! into either a successful [`reqwest::Response`] or an [`ApiError`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use taskdeck_core::ApiError;
use taskdeck_settings::ApiSettings;

/// Base URL plus a configured client.
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl Transport {
    /// Build a transport with the configured timeout and user agent.
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            client: build_client(settings),
            settings: settings.clone(),
        }
    }

    /// Absolute URL for a service path.
    pub fn url(&self, path: &str) -> String {
        self.settings.url(path)
    }

    /// The underlying client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request, classifying non-success statuses.
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), kind = %err.kind(), "request rejected");
        Err(err)
    }
}

/// reqwest client honouring the configured timeout.
pub fn build_client(settings: &ApiSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .user_agent(settings.user_agent.as_str())
        .build()
        .unwrap_or_default()
}

/// Decode a JSON body. A malformed body counts as a transport failure.
pub async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::network(format!("invalid response body: {e}")))
}

/// Map a reqwest failure to a [`ApiError::Network`].
pub fn network_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network("request timed out")
    } else if err.is_connect() {
        ApiError::network(format!("could not reach server: {err}"))
    } else {
        ApiError::network(format!("request failed: {err}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
