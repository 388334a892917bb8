//! Engine configuration

use serde::Deserialize;

use domain_claims::ClaimPolicy;

/// Settings of the assessment engine
///
/// Loaded from `ENGINE_*` environment variables; nested claim policy values
/// use a double underscore, e.g. `ENGINE_CLAIM_POLICY__PRIORITY=high`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Type, priority and severity stamped on every warranty claim
    pub claim_policy: ClaimPolicy,
    /// Identity recorded as creator when a request names no assessor
    pub default_assessor: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            claim_policy: ClaimPolicy::default(),
            default_assessor: "billing-engine".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ENGINE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
