//! HTTP API Layer
//!
//! A thin axum host around [`BillingAssessmentService`].
//!
//! # Routes
//!
//! - `GET /health`: liveness
//! - `GET /health/ready`: aggregated collaborator adapter health
//! - `POST /api/v1/assessments`: assess a completed work order
//! - `GET /api/v1/work-orders/:id/assessments`: assessment history
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, health_checks, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_billing::BillingAssessmentService;

use crate::config::ApiConfig;
use crate::handlers::{assessments, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BillingAssessmentService>,
    /// Adapters reported by `/health/ready`
    pub health_checks: Arc<Vec<Arc<dyn HealthCheckable>>>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        service: BillingAssessmentService,
        health_checks: Vec<Arc<dyn HealthCheckable>>,
        config: ApiConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            health_checks: Arc::new(health_checks),
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/assessments", post(assessments::assess_work_order))
        .route("/work-orders/:id/assessments", get(assessments::list_assessments));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
