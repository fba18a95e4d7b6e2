//! HTTP Advisory Backend - Implementation of AdvisoryBackend over JSON/HTTP.
//!
//! Talks to the advisory REST API mounted under `{base_url}/api`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpBackendConfig::new("http://localhost:8001")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let backend = HttpAdvisoryBackend::new(config)?;
//! ```
//!
//! # Status mapping
//!
//! Non-2xx responses become `TransportError::Status` carrying the server's
//! `detail` message. The advice endpoint answers `202 Accepted` (or a body with
//! `"status": "processing"`) while generation is still running; both map to
//! `AdviceStatus::Processing`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::domain::foundation::SessionId;
use crate::domain::session::ProbingAnswers;
use crate::ports::{
    AdviceResponse, AdviceStatus, AdvisoryBackend, CreateSessionRequest, CreateSessionResponse,
    ServiceStatus, SubmitAnswersRequest, SubmitAnswersResponse, TransportError,
};

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Server origin, without the `/api` suffix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpBackendConfig {
    /// Creates a configuration for `base_url` with a 60 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&BackendConfig> for HttpBackendConfig {
    fn from(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone()).with_timeout(config.timeout())
    }
}

/// Advisory backend reached over HTTP.
pub struct HttpAdvisoryBackend {
    api_url: Url,
    client: Client,
}

impl HttpAdvisoryBackend {
    /// Creates a backend client.
    ///
    /// # Errors
    ///
    /// - `Client` if the base URL does not parse or the underlying HTTP
    ///   client cannot be built
    pub fn new(config: HttpBackendConfig) -> Result<Self, TransportError> {
        let api_url = api_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_url, client })
    }

    /// Endpoint URL below `/api`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Client(format!("Cannot append a path to {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request, returning the response only for success statuses.
    async fn send(&self, label: &str, request: RequestBuilder) -> Result<Response, TransportError> {
        debug!(request = label, "API request");

        let response = request.send().await.map_err(|e| {
            warn!(request = label, error = %e, "API request failed");
            if e.is_builder() {
                TransportError::Client(format!("Request could not be built: {}", e))
            } else if e.is_timeout() {
                TransportError::no_response(format!("Request timed out: {}", e))
            } else if e.is_connect() {
                TransportError::no_response(format!("Connection failed: {}", e))
            } else {
                TransportError::no_response(e.to_string())
            }
        })?;

        let status = response.status();
        debug!(request = label, status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(request = label, status = status.as_u16(), body = %body, "API error response");
        Err(TransportError::status(status.as_u16(), parse_detail(&body)))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::decode(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl AdvisoryBackend for HttpAdvisoryBackend {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, TransportError> {
        let response = self
            .send(
                "POST /sessions",
                self.client.post(self.url(&["sessions"])?).json(request),
            )
            .await?;
        Self::decode(response).await
    }

    async fn submit_answers(
        &self,
        session_id: &SessionId,
        answers: &ProbingAnswers,
    ) -> Result<SubmitAnswersResponse, TransportError> {
        let url = self.url(&["sessions", session_id.as_str(), "probing-answers"])?;
        let response = self
            .send(
                "POST /sessions/{id}/probing-answers",
                self.client
                    .post(url)
                    .json(&SubmitAnswersRequest { answers }),
            )
            .await?;
        Self::decode(response).await
    }

    async fn get_advice(&self, session_id: &SessionId) -> Result<AdviceStatus, TransportError> {
        let url = self.url(&["sessions", session_id.as_str(), "advice"])?;
        let response = self
            .send("GET /sessions/{id}/advice", self.client.get(url))
            .await?;

        if response.status() == StatusCode::ACCEPTED {
            return Ok(AdviceStatus::Processing);
        }
        let body: AdviceResponse = Self::decode(response).await?;
        AdviceStatus::try_from(body)
    }

    async fn health(&self) -> Result<ServiceStatus, TransportError> {
        let response = self.send("GET /", self.client.get(self.url(&[""])?)).await?;
        Self::decode(response).await
    }
}

/// Appends `/api` to the origin, tolerating a trailing slash.
fn api_url(base_url: &str) -> Result<Url, TransportError> {
    Url::parse(&format!("{}/api", base_url.trim().trim_end_matches('/')))
        .map_err(|e| TransportError::Client(format!("Invalid backend URL {:?}: {}", base_url, e)))
}

/// Extracts a human-readable `detail` from an error body.
///
/// Accepts `{"detail": "..."}` and validation-style
/// `{"detail": [{"msg": "..."}]}` bodies.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    match parsed.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
