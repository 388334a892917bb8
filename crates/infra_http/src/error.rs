//! HTTP adapter error types
//!
//! Failures are first described in HTTP terms, then translated to
//! `PortError` at the port boundary:
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - timeouts -> `PortError::Timeout`
//! - `{"success": false}` -> `PortError::Rejected`, message kept verbatim

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-2xx answer
    #[error("{collaborator} answered HTTP {status}: {body}")]
    Status {
        collaborator: &'static str,
        status: u16,
        retry_after_secs: Option<u64>,
        body: String,
    },

    /// No answer within the configured timeout
    #[error("{collaborator} did not answer within {timeout_ms}ms")]
    Timeout {
        collaborator: &'static str,
        timeout_ms: u64,
    },

    /// Connection refused, reset, DNS failure and the like
    #[error("could not reach {collaborator}: {source}")]
    Transport {
        collaborator: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The collaborator answered `success: false`
    #[error("{message}")]
    Rejected { message: String },

    #[error("{collaborator} reported success without data")]
    MissingData { collaborator: &'static str },

    #[error("unreadable response from {collaborator}: {source}")]
    Decode {
        collaborator: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("circuit breaker for {collaborator} is open")]
    CircuitOpen { collaborator: &'static str },

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl HttpError {
    /// Classifies a reqwest failure that happened before any answer arrived
    pub fn from_reqwest(collaborator: &'static str, timeout_ms: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            HttpError::Timeout {
                collaborator,
                timeout_ms,
            }
        } else {
            HttpError::Transport {
                collaborator,
                source,
            }
        }
    }

    /// Whether the same request may succeed if sent again
    pub fn is_transient(&self) -> bool {
        match self {
            HttpError::Status { status, .. } => *status == 429 || *status >= 500,
            HttpError::Timeout { .. } | HttpError::Transport { .. } => true,
            _ => false,
        }
    }
}

impl From<HttpError> for PortError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Status {
                collaborator,
                status,
                retry_after_secs,
                body,
            } => match status {
                404 => PortError::not_found(collaborator, body),
                401 | 403 => PortError::Unauthorized { message: body },
                429 => PortError::RateLimited {
                    retry_after_secs: retry_after_secs.unwrap_or(1),
                },
                500..=599 => PortError::ServiceUnavailable {
                    service: collaborator.to_string(),
                },
                400 | 422 => PortError::validation(body),
                _ => PortError::internal(format!(
                    "{} answered HTTP {}: {}",
                    collaborator, status, body
                )),
            },
            HttpError::Timeout {
                collaborator,
                timeout_ms,
            } => PortError::Timeout {
                operation: collaborator.to_string(),
                duration_ms: timeout_ms,
            },
            HttpError::Transport {
                collaborator,
                source,
            } => PortError::Connection {
                message: format!("could not reach {}", collaborator),
                source: Some(Box::new(source)),
            },
            HttpError::Rejected { message } => PortError::rejected(message),
            error @ (HttpError::MissingData { .. } | HttpError::Decode { .. }) => {
                PortError::Transformation {
                    message: error.to_string(),
                }
            }
            HttpError::CircuitOpen { collaborator } => PortError::ServiceUnavailable {
                service: format!("{} (circuit breaker is open)", collaborator),
            },
            HttpError::Client(source) => PortError::Internal {
                message: "HTTP client setup failed".to_string(),
                source: Some(Box::new(source)),
            },
        }
    }
}
