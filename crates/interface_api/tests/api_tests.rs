//! API route tests against in-memory collaborator ports

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};
use domain_billing::{
    BillingAssessmentService, EngineConfig, MockAssessmentPort, MockCoveragePort,
    MockSalesOrderPort,
};
use domain_claims::MockWarrantyClaimPort;
use domain_workorder::{CoverageVerdict, WorkOrder};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::WorkOrderBuilder;

struct Harness {
    server: TestServer,
    coverage: Arc<MockCoveragePort>,
    sales_orders: Arc<MockSalesOrderPort>,
    claims: Arc<MockWarrantyClaimPort>,
    assessments: Arc<MockAssessmentPort>,
}

fn harness_with(extra_health: Vec<Arc<dyn HealthCheckable>>) -> Harness {
    let coverage = Arc::new(MockCoveragePort::answering(CoverageVerdict::fully_covered()));
    let sales_orders = Arc::new(MockSalesOrderPort::new());
    let claims = Arc::new(MockWarrantyClaimPort::new());
    let assessments = Arc::new(MockAssessmentPort::new());

    let service = BillingAssessmentService::new(
        coverage.clone(),
        sales_orders.clone(),
        claims.clone(),
        assessments.clone(),
        EngineConfig::default(),
    );
    let mut health_checks: Vec<Arc<dyn HealthCheckable>> = vec![
        coverage.clone() as Arc<dyn HealthCheckable>,
        sales_orders.clone() as Arc<dyn HealthCheckable>,
        claims.clone() as Arc<dyn HealthCheckable>,
        assessments.clone() as Arc<dyn HealthCheckable>,
    ];
    health_checks.extend(extra_health);

    let app = create_router(AppState::new(service, health_checks, ApiConfig::default()));
    Harness {
        server: TestServer::new(app).unwrap(),
        coverage,
        sales_orders,
        claims,
        assessments,
    }
}

fn harness() -> Harness {
    harness_with(Vec::new())
}

/// Covered labor, billable part
fn mixed_order() -> WorkOrder {
    WorkOrderBuilder::new()
        .with_warranty_card()
        .with_labor(dec!(2), dec!(50), true)
        .with_part(1, dec!(30), false)
        .build()
}

struct TrippedAdapter;

#[async_trait]
impl HealthCheckable for TrippedAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            status: AdapterHealth::Degraded,
            message: Some("Circuit breaker is open".to_string()),
            ..HealthCheckResult::healthy("tripped-adapter", 0)
        }
    }
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_all_adapters() {
    let h = harness();
    let response = h.server.get("/health/ready").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["adapters"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_readiness_degraded_when_a_breaker_is_open() {
    let h = harness_with(vec![Arc::new(TrippedAdapter) as Arc<dyn HealthCheckable>]);
    let response = h.server.get("/health/ready").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "degraded");
}

#[tokio::test]
async fn test_assess_mixed_work_order() {
    let h = harness();
    let order = mixed_order();

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": order, "assessedBy": "tech-7" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["billingStatus"], "mixed");
    assert_eq!(body["branch"], "both");
    assert_eq!(body["sideEffects"]["salesOrder"]["outcome"], "submitted");
    assert_eq!(body["sideEffects"]["warrantyClaim"]["outcome"], "submitted");
    assert_eq!(body["assessment"]["assessedBy"], "tech-7");

    assert_eq!(h.coverage.requests().await.len(), 1);
    assert_eq!(h.sales_orders.call_count().await, 1);
    assert_eq!(h.claims.call_count().await, 1);
    assert_eq!(h.assessments.all().await.len(), 1);
}

#[tokio::test]
async fn test_supplied_verdict_skips_verification() {
    let h = harness();
    let order = mixed_order();

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({
            "workOrder": order,
            "verdict": CoverageVerdict::not_covered(),
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["billingStatus"], "billable");
    assert!(h.coverage.requests().await.is_empty());
    assert_eq!(h.claims.call_count().await, 0);
}

#[tokio::test]
async fn test_incomplete_work_order_is_unprocessable() {
    let h = harness();
    let order = WorkOrderBuilder::new()
        .with_labor(dec!(1), dec!(40), false)
        .in_progress()
        .build();

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": order }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"], "validation_error");
    assert_eq!(h.assessments.all().await.len(), 0);
}

#[tokio::test]
async fn test_blank_assessor_is_rejected() {
    let h = harness();

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": mixed_order(), "assessedBy": "" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.sales_orders.call_count().await, 0);
}

#[tokio::test]
async fn test_out_of_range_amounts_are_unprocessable() {
    let h = harness();
    let mut order = serde_json::to_value(
        WorkOrderBuilder::new()
            .with_service(dec!(10), false)
            .with_service(dec!(10), false)
            .build(),
    )
    .unwrap();
    for service in order["services"].as_array_mut().unwrap() {
        service["cost"]["amount"] = json!(5e28);
    }

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": order }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"], "validation_error");
    assert_eq!(h.sales_orders.call_count().await, 0);
}

#[tokio::test]
async fn test_coverage_outage_is_service_unavailable() {
    let h = harness();
    h.coverage.set_unavailable().await;

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": mixed_order() }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(h.sales_orders.call_count().await, 0);
}

#[tokio::test]
async fn test_persistence_failure_reports_side_effects() {
    let h = harness();
    h.assessments.set_unavailable().await;

    let response = h
        .server
        .post("/api/v1/assessments")
        .json(&json!({ "workOrder": mixed_order() }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body = response.json::<Value>();
    assert_eq!(body["error"], "upstream_error");
    assert_eq!(body["details"]["salesOrder"]["outcome"], "submitted");
    assert_eq!(body["details"]["warrantyClaim"]["outcome"], "submitted");
}

#[tokio::test]
async fn test_history_lists_recorded_assessments() {
    let h = harness();
    let order = mixed_order();

    for _ in 0..2 {
        h.server
            .post("/api/v1/assessments")
            .json(&json!({ "workOrder": order }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = h
        .server
        .get(&format!("/api/v1/work-orders/{}/assessments", order.id.as_uuid()))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    let listed = body["assessments"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0]["assessedAt"].as_str() >= listed[1]["assessedAt"].as_str());
}

#[tokio::test]
async fn test_history_rejects_malformed_id() {
    let h = harness();
    let response = h.server.get("/api/v1/work-orders/not-a-uuid/assessments").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
