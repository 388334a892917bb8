//! Billing Assessment API - Server Binary
//!
//! # Usage
//!
//! ```bash
//! COLLAB_BASE_URL=http://platform.internal API_PORT=8080 cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` / `API_PORT` - bind address (default: 0.0.0.0:8080)
//! * `API_LOG_LEVEL` - log filter when `RUST_LOG` is unset (default: info)
//! * `API_LOG_JSON` - emit JSON log lines (default: false)
//! * `COLLAB_*` - collaborator endpoints, API key, timeouts, retries, breaker
//! * `ENGINE_*` - claim policy and default assessor

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::HealthCheckable;
use domain_billing::{BillingAssessmentService, EngineConfig};
use infra_http::{
    CollaboratorClient, CollaboratorConfig, HttpAssessmentAdapter, HttpCoverageAdapter,
    HttpSalesOrderAdapter, HttpWarrantyClaimAdapter,
};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;
    init_tracing(&config);

    let collaborators = CollaboratorConfig::from_env().context("invalid COLLAB_* configuration")?;
    let engine = EngineConfig::from_env().context("invalid ENGINE_* configuration")?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        collaborators = %collaborators.base_url,
        "Starting billing assessment API"
    );

    let client = CollaboratorClient::new(collaborators)?;
    let coverage = Arc::new(HttpCoverageAdapter::new(client.clone()));
    let sales_orders = Arc::new(HttpSalesOrderAdapter::new(client.clone()));
    let claims = Arc::new(HttpWarrantyClaimAdapter::new(client.clone()));
    let assessments = Arc::new(HttpAssessmentAdapter::new(client));

    let health_checks: Vec<Arc<dyn HealthCheckable>> = vec![
        coverage.clone() as Arc<dyn HealthCheckable>,
        sales_orders.clone() as Arc<dyn HealthCheckable>,
        claims.clone() as Arc<dyn HealthCheckable>,
        assessments.clone() as Arc<dyn HealthCheckable>,
    ];
    let service = BillingAssessmentService::new(coverage, sales_orders, claims, assessments, engine);

    let app = create_router(AppState::new(service, health_checks, config.clone()));

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for Ctrl+C or SIGTERM so in-flight assessments can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
