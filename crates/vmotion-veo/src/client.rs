//! Veo REST API client.
//!
//! Talks to the Gemini API long-running operations endpoints:
//! - `POST models/{model}:predictLongRunning` to submit
//! - `GET {operation name}` to poll
//! - `GET {artifact uri}&key=...` to download the finished video

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info_span, Instrument};
use url::Url;

use vmotion_models::{ApiKey, JobHandle};

use crate::error::{VeoError, VeoResult};
use crate::metrics::{record_artifact_bytes, record_request};
use crate::request::VideoRequest;
use crate::service::VideoJobService;
use crate::types::{Operation, PredictLongRunningRequest};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default video generation model.
pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";

// =============================================================================
// Configuration
// =============================================================================

/// Veo client configuration.
#[derive(Debug, Clone)]
pub struct VeoConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout (covers artifact downloads)
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for VeoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl VeoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_API_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("VEO_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("VEO_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// Veo long-running generation client.
#[derive(Clone)]
pub struct VeoClient {
    http: Client,
    config: VeoConfig,
}

impl VeoClient {
    /// Create a new client.
    pub fn new(config: VeoConfig) -> VeoResult<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            VeoError::config_error(format!("invalid base URL {:?}: {}", config.base_url, e))
        })?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("vmotion-veo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VeoError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VeoResult<Self> {
        Self::new(VeoConfig::from_env())
    }

    pub fn config(&self) -> &VeoConfig {
        &self.config
    }

    fn submit_url(&self, model: &str) -> String {
        format!("{}/models/{}:predictLongRunning", self.config.base_url, model)
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url, name.trim_start_matches('/'))
    }

    /// Append the access key to an artifact locator as a query parameter.
    pub fn artifact_url(locator: &str, credential: &ApiKey) -> VeoResult<Url> {
        let mut url = Url::parse(locator)
            .map_err(|e| VeoError::InvalidLocator(format!("{}: {}", locator, e)))?;
        url.query_pairs_mut().append_pair("key", credential.expose());
        Ok(url)
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Execute a request with tracing and metrics.
    async fn execute_request<T, F>(&self, operation: &str, fut: F) -> VeoResult<T>
    where
        F: std::future::Future<Output = VeoResult<T>>,
    {
        let span = info_span!("veo_request", operation = %operation);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn read_operation(response: Response) -> VeoResult<JobHandle> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(VeoError::from_http_status(status.as_u16(), &body));
        }

        let op: Operation = serde_json::from_str(&body).map_err(|e| {
            VeoError::invalid_response(format!("Failed to parse operation: {}", e))
        })?;

        Ok(op.into())
    }
}

#[async_trait]
impl VideoJobService for VeoClient {
    async fn submit(&self, credential: &ApiKey, request: &VideoRequest) -> VeoResult<JobHandle> {
        let url = self.submit_url(&request.model);
        let body = PredictLongRunningRequest::from(request);

        self.execute_request("submit", async {
            debug!(
                model = %request.model,
                resolution = %request.resolution,
                aspect_ratio = %request.aspect_ratio,
                with_image = request.image.is_some(),
                "Submitting video generation request"
            );

            let response = self
                .http
                .post(&url)
                .header(API_KEY_HEADER, credential.expose())
                .json(&body)
                .send()
                .await?;

            Self::read_operation(response).await
        })
        .await
    }

    async fn poll(&self, credential: &ApiKey, job: &JobHandle) -> VeoResult<JobHandle> {
        let url = self.operation_url(&job.name);

        self.execute_request("poll", async {
            let response = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, credential.expose())
                .send()
                .await?;

            Self::read_operation(response).await
        })
        .await
    }

    async fn fetch_artifact(&self, credential: &ApiKey, locator: &str) -> VeoResult<Vec<u8>> {
        let url = Self::artifact_url(locator, credential)?;

        self.execute_request("fetch_artifact", async {
            let response = self.http.get(url).send().await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(VeoError::from_http_status(status.as_u16(), &body));
            }

            let bytes = response.bytes().await?;
            record_artifact_bytes(bytes.len());
            debug!(size_bytes = bytes.len(), "Downloaded video artifact");

            Ok(bytes.to_vec())
        })
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
