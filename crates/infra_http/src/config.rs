//! Collaborator connection settings

use serde::Deserialize;
use std::time::Duration;

use core_kernel::CircuitBreakerConfig;

/// Where the collaborator services live and how to talk to them
///
/// Loaded from `COLLAB_*` environment variables, e.g. `COLLAB_BASE_URL`,
/// `COLLAB_API_KEY`, `COLLAB_TIMEOUT_SECS`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// Base URL shared by every collaborator endpoint
    pub base_url: String,
    pub coverage_path: String,
    pub sales_order_path: String,
    pub claim_path: String,
    pub assessment_path: String,
    /// Sent as a bearer token when set
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt, transient failures only
    pub retry_attempts: u32,
    /// Delay before the first retry, doubled on each further retry
    pub retry_backoff_ms: u64,
    pub breaker_failure_threshold: u32,
    pub breaker_reset_timeout_secs: u64,
    pub breaker_success_threshold: u32,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        let breaker = CircuitBreakerConfig::default();
        Self {
            base_url: "http://localhost:3000".to_string(),
            coverage_path: "/api/warranty/coverage-check".to_string(),
            sales_order_path: "/api/sales-orders".to_string(),
            claim_path: "/api/warranty-claims".to_string(),
            assessment_path: "/api/billing-assessments".to_string(),
            api_key: None,
            timeout_secs: 10,
            retry_attempts: 3,
            retry_backoff_ms: 200,
            breaker_failure_threshold: breaker.failure_threshold,
            breaker_reset_timeout_secs: breaker.reset_timeout_secs,
            breaker_success_threshold: breaker.success_threshold,
        }
    }
}

impl CollaboratorConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("COLLAB").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Configuration pointing every endpoint at `base_url`
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff before retry number `retry` (zero-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(1u64 << retry.min(16)))
    }

    pub fn circuit_breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.breaker_failure_threshold,
            reset_timeout_secs: self.breaker_reset_timeout_secs,
            success_threshold: self.breaker_success_threshold,
        }
    }

    /// Joins the base URL and an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = CollaboratorConfig::for_base_url("http://billing.local/");
        assert_eq!(
            config.url("/api/sales-orders"),
            "http://billing.local/api/sales-orders"
        );
        assert_eq!(config.url("health"), "http://billing.local/health");
    }

    #[test]
    fn test_backoff_doubles() {
        let config = CollaboratorConfig {
            retry_backoff_ms: 100,
            ..CollaboratorConfig::default()
        };
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(400));
    }

    #[test]
    fn test_breaker_defaults_follow_kernel() {
        let config = CollaboratorConfig::default();
        let breaker = config.circuit_breaker();
        assert_eq!(breaker.failure_threshold, 5);
        assert_eq!(breaker.reset_timeout_secs, 30);
        assert_eq!(breaker.success_threshold, 3);
    }
}
