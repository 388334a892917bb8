//! Circuit breaker for collaborator calls
//!
//! After `failure_threshold` consecutive transient failures the breaker
//! opens and calls fail immediately. Once `reset_timeout_secs` has passed it
//! lets calls through again (half-open); `success_threshold` successes close
//! it, another run of failures reopens it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use core_kernel::CircuitBreakerConfig;

/// Observable state of a breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn state(&self) -> BreakerState {
        if !self.is_open.load(Ordering::Relaxed) {
            return BreakerState::Closed;
        }

        let opened_at = self.opened_at.read().await;
        match *opened_at {
            Some(time) if time.elapsed() >= Duration::from_secs(self.config.reset_timeout_secs) => {
                BreakerState::HalfOpen
            }
            _ => BreakerState::Open,
        }
    }

    /// Whether a call may go out now
    pub async fn is_available(&self) -> bool {
        self.state().await != BreakerState::Open
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }
        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    pub async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= u64::from(self.config.failure_threshold) {
            if !self.is_open.swap(true, Ordering::Relaxed) {
                warn!(collaborator = self.name, failures, "Circuit breaker opened");
            }
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}
