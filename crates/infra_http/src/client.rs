//! Shared HTTP client and per-collaborator endpoints

use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use core_kernel::OperationMetadata;

use crate::circuit_breaker::CircuitBreaker;
use crate::config::CollaboratorConfig;
use crate::envelope::ApiEnvelope;
use crate::error::HttpError;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Connection pool plus the settings every endpoint shares
#[derive(Debug, Clone)]
pub struct CollaboratorClient {
    http: reqwest::Client,
    config: Arc<CollaboratorConfig>,
}

impl CollaboratorClient {
    pub fn new(config: CollaboratorConfig) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &CollaboratorConfig {
        &self.config
    }

    /// Endpoint at `path` with a fresh circuit breaker
    pub fn endpoint(&self, collaborator: &'static str, path: &str) -> Endpoint {
        Endpoint {
            url: self.config.url(path),
            breaker: Arc::new(CircuitBreaker::new(
                collaborator,
                self.config.circuit_breaker(),
            )),
            collaborator,
            client: self.clone(),
        }
    }
}

/// One collaborator URL with its own circuit breaker
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: CollaboratorClient,
    collaborator: &'static str,
    url: String,
    breaker: Arc<CircuitBreaker>,
}

impl Endpoint {
    pub fn collaborator(&self) -> &'static str {
        self.collaborator
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn post<B, T>(&self, body: &B, metadata: Option<&OperationMetadata>) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, &[], Some(body), metadata).await
    }

    pub async fn get<T>(
        &self,
        query: &[(&str, String)],
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.execute::<(), T>(Method::GET, query, None, metadata).await
    }

    /// Sends the request, retrying transient failures with backoff
    ///
    /// The idempotency key from `metadata` goes out unchanged on every
    /// attempt.
    #[instrument(skip(self, query, body, metadata), fields(collaborator = self.collaborator, url = %self.url))]
    async fn execute<B, T>(
        &self,
        method: Method,
        query: &[(&str, String)],
        body: Option<&B>,
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let config = self.client.config();
        let mut retry = 0;

        loop {
            if !self.breaker.is_available().await {
                return Err(HttpError::CircuitOpen {
                    collaborator: self.collaborator,
                });
            }

            match self.send_once(method.clone(), query, body, metadata).await {
                Ok(value) => {
                    self.breaker.record_success();
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    self.breaker.record_failure().await;
                    if retry >= config.retry_attempts {
                        warn!(error = %err, attempts = retry + 1, "Collaborator call failed, giving up");
                        return Err(err);
                    }
                    let delay = config.backoff(retry);
                    warn!(
                        error = %err,
                        attempt = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Transient collaborator failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => {
                    // it answered, so it is reachable
                    self.breaker.record_success();
                    return Err(err);
                }
            }
        }
    }

    async fn send_once<B, T>(
        &self,
        method: Method,
        query: &[(&str, String)],
        body: Option<&B>,
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let config = self.client.config();
        let timeout_ms = config.timeout().as_millis() as u64;

        let mut request = self
            .client
            .http
            .request(method, &self.url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            request = request.bearer_auth(api_key);
        }
        if let Some(metadata) = metadata {
            if let Some(key) = &metadata.idempotency_key {
                request = request.header(IDEMPOTENCY_KEY_HEADER, key.to_string());
            }
            if let Some(correlation_id) = &metadata.correlation_id {
                request = request.header(CORRELATION_ID_HEADER, correlation_id.as_str());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(self.collaborator, timeout_ms, e))?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::from_reqwest(self.collaborator, timeout_ms, e))?;

        debug!(status = status.as_u16(), "Collaborator answered");

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|source| HttpError::Decode {
                collaborator: self.collaborator,
                source,
            });
        }

        // some services report business rejections as 4xx with an envelope
        if status.is_client_error() && !matches!(status.as_u16(), 401 | 403 | 404 | 429) {
            if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text) {
                if !envelope.success {
                    if let Some(message) = envelope.error {
                        return Err(HttpError::Rejected { message });
                    }
                }
            }
        }

        Err(HttpError::Status {
            collaborator: self.collaborator,
            status: status.as_u16(),
            retry_after_secs,
            body: text,
        })
    }
}
