//! HTTP adapter tests against a wiremock collaborator

use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{
    AdapterHealth, HealthCheckable, IdempotencyKey, OperationMetadata, PortError, WarrantyCardId,
};
use domain_billing::{
    calculate, classify, generate_sales_order, AssessmentInput, AssessmentPort, BillingAssessment,
    CoveragePort, SalesOrderPort, SalesOrderRequest,
};
use domain_claims::{ClaimPolicy, WarrantyClaimPort, WarrantyClaimRequest};
use domain_workorder::{CoverageCheckRequest, CoverageVerdict, WorkOrder};
use infra_http::{
    CollaboratorClient, CollaboratorConfig, HttpAssessmentAdapter, HttpCoverageAdapter,
    HttpSalesOrderAdapter, HttpWarrantyClaimAdapter,
};
use test_utils::WorkOrderBuilder;

fn config(server: &MockServer) -> CollaboratorConfig {
    CollaboratorConfig {
        retry_backoff_ms: 1,
        timeout_secs: 2,
        api_key: Some("secret".to_string()),
        ..CollaboratorConfig::for_base_url(server.uri())
    }
}

fn client(config: CollaboratorConfig) -> CollaboratorClient {
    CollaboratorClient::new(config).unwrap()
}

fn work_order() -> WorkOrder {
    WorkOrderBuilder::new()
        .with_warranty_card()
        .with_labor(dec!(2), dec!(50), false)
        .with_part(1, dec!(30), false)
        .build()
}

fn sales_order_request(order: &WorkOrder) -> SalesOrderRequest {
    let calculation = calculate(order, &CoverageVerdict::not_covered()).unwrap();
    generate_sales_order(order, &calculation, "tech-7")
}

fn assessment(order: &WorkOrder) -> BillingAssessment {
    let verdict = CoverageVerdict::not_covered();
    let calculation = calculate(order, &verdict).unwrap();
    BillingAssessment::from_input(AssessmentInput {
        service_request_id: order.service_request_id,
        work_order_id: order.id,
        calculation: &calculation,
        status: classify(&verdict, &calculation),
        sales_order_id: None,
        warranty_claim_id: None,
        assessed_by: "tech-7",
        idempotency_key: None,
    })
}

fn metadata_for(order: &WorkOrder) -> (IdempotencyKey, OperationMetadata) {
    let key = IdempotencyKey::fresh(order.id);
    (key, OperationMetadata::for_attempt(key, "tech-7"))
}

#[tokio::test]
async fn test_coverage_check_reads_plain_response() {
    let server = MockServer::start().await;
    let order = work_order();
    let card = order.warranty_card_id.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/warranty/coverage-check"))
        .and(body_partial_json(json!({
            "workOrderId": order.id,
            "warrantyCardId": card,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isWarrantyCovered": true,
            "coverageDetails": { "labor": true, "parts": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HttpCoverageAdapter::new(client(config(&server)));
    let verdict = adapter
        .check_coverage(
            &CoverageCheckRequest {
                work_order_id: order.id,
                warranty_card_id: card,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(verdict, CoverageVerdict::new(true, true, false));
}

#[tokio::test]
async fn test_sales_order_sends_idempotency_key_and_api_key() {
    let server = MockServer::start().await;
    let order = work_order();
    let (key, metadata) = metadata_for(&order);

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .and(header("Idempotency-Key", key.to_string().as_str()))
        .and(header("Authorization", "Bearer secret"))
        .and(body_partial_json(json!({ "orderType": "service", "status": "pending" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "id": "SO-1042" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(config(&server)));
    let reference = adapter
        .create_sales_order(&sales_order_request(&order), Some(metadata))
        .await
        .unwrap();

    assert_eq!(reference.to_string(), "SO-1042");
}

#[tokio::test]
async fn test_sales_order_rejection_is_verbatim_and_not_retried() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Customer is on credit hold"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(config(&server)));
    let err = adapter
        .create_sales_order(&sales_order_request(&order), None)
        .await
        .unwrap_err();

    match err {
        PortError::Rejected { message } => assert_eq!(message, "Customer is on credit hold"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_envelope_is_a_rejection() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "error": "Unknown customer"
        })))
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(config(&server)));
    let err = adapter
        .create_sales_order(&sales_order_request(&order), None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unknown customer");
}

#[tokio::test]
async fn test_transient_failures_are_retried_with_the_same_key() {
    let server = MockServer::start().await;
    let order = work_order();
    let (key, metadata) = metadata_for(&order);

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "SO-7" }
        })))
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(config(&server)));
    let reference = adapter
        .create_sales_order(&sales_order_request(&order), Some(metadata))
        .await
        .unwrap();
    assert_eq!(reference.to_string(), "SO-7");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for request in requests {
        let sent = request.headers.get("Idempotency-Key").unwrap();
        assert_eq!(sent.to_str().unwrap(), key.to_string());
    }
}

#[tokio::test]
async fn test_retries_give_up_after_configured_attempts() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(CollaboratorConfig {
        retry_attempts: 2,
        ..config(&server)
    }));
    let err = adapter
        .create_sales_order(&sales_order_request(&order), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn test_open_breaker_short_circuits_and_degrades_health() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = HttpSalesOrderAdapter::new(client(CollaboratorConfig {
        retry_attempts: 0,
        breaker_failure_threshold: 2,
        breaker_reset_timeout_secs: 60,
        ..config(&server)
    }));
    assert_eq!(adapter.health_check().await.status, AdapterHealth::Healthy);

    let request = sales_order_request(&order);
    for _ in 0..2 {
        adapter.create_sales_order(&request, None).await.unwrap_err();
    }

    let err = adapter.create_sales_order(&request, None).await.unwrap_err();
    match err {
        PortError::ServiceUnavailable { service } => assert!(service.contains("circuit breaker")),
        other => panic!("expected open breaker, got {:?}", other),
    }

    let health = adapter.health_check().await;
    assert_eq!(health.status, AdapterHealth::Degraded);
    assert!(health.message.unwrap().contains("open"));
}

#[tokio::test]
async fn test_breakers_are_per_collaborator() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let shared = client(CollaboratorConfig {
        retry_attempts: 0,
        breaker_failure_threshold: 1,
        ..config(&server)
    });
    let sales_orders = HttpSalesOrderAdapter::new(shared.clone());
    let claims = HttpWarrantyClaimAdapter::new(shared);

    sales_orders
        .create_sales_order(&sales_order_request(&order), None)
        .await
        .unwrap_err();

    assert_eq!(sales_orders.health_check().await.status, AdapterHealth::Degraded);
    assert_eq!(claims.health_check().await.status, AdapterHealth::Healthy);
}

#[tokio::test]
async fn test_slow_collaborator_times_out() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/warranty/coverage-check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(json!({ "isWarrantyCovered": false })),
        )
        .mount(&server)
        .await;

    let adapter = HttpCoverageAdapter::new(client(CollaboratorConfig {
        timeout_secs: 1,
        retry_attempts: 0,
        ..config(&server)
    }));
    let err = adapter
        .check_coverage(
            &CoverageCheckRequest {
                work_order_id: order.id,
                warranty_card_id: WarrantyCardId::new(),
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::Timeout { duration_ms: 1000, .. }));
}

#[tokio::test]
async fn test_auth_and_missing_resources_map_to_port_errors() {
    let server = MockServer::start().await;
    let order = work_order();

    Mock::given(method("POST"))
        .and(path("/api/sales-orders"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/warranty-claims"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such card"))
        .mount(&server)
        .await;

    let shared = client(config(&server));
    let err = HttpSalesOrderAdapter::new(shared.clone())
        .create_sales_order(&sales_order_request(&order), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Unauthorized { .. }));

    let claim = WarrantyClaimRequest::new(
        WarrantyCardId::new(),
        "Compressor failure",
        "WO-1",
        "tech-7",
        ClaimPolicy::default(),
    )
    .unwrap();
    let err = HttpWarrantyClaimAdapter::new(shared)
        .create_claim(&claim, None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_claim_accepts_numeric_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/warranty-claims"))
        .and(body_partial_json(json!({
            "claimType": "repair",
            "priority": "medium",
            "severity": "moderate",
            "evidence": { "photos": [], "documents": [], "videos": [] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 77 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let claim = WarrantyClaimRequest::new(
        WarrantyCardId::new(),
        "Compressor failure",
        "WO-1",
        "tech-7",
        ClaimPolicy::default(),
    )
    .unwrap();
    let reference = HttpWarrantyClaimAdapter::new(client(config(&server)))
        .create_claim(&claim, None)
        .await
        .unwrap();

    assert_eq!(reference.to_string(), "77");
}

#[tokio::test]
async fn test_assessment_save_returns_stored_record() {
    let server = MockServer::start().await;
    let order = work_order();
    let record = assessment(&order);

    Mock::given(method("POST"))
        .and(path("/api/billing-assessments"))
        .and(body_partial_json(json!({
            "billingStatus": "billable",
            "billableTotal": { "amount": 130.0, "currency": "USD" },
            "billable": { "labor": { "amount": 100.0, "currency": "USD" } },
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": &record,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = HttpAssessmentAdapter::new(client(config(&server)))
        .save(&record, None)
        .await
        .unwrap();

    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_assessment_listing_is_newest_first() {
    let server = MockServer::start().await;
    let order = work_order();

    let mut older = assessment(&order);
    older.assessed_at = Utc::now() - ChronoDuration::hours(2);
    let newer = assessment(&order);

    Mock::given(method("GET"))
        .and(path("/api/billing-assessments"))
        .and(query_param("workOrderId", order.id.as_uuid().to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [&older, &newer],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listed = HttpAssessmentAdapter::new(client(config(&server)))
        .find_by_work_order(order.id, None)
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}
