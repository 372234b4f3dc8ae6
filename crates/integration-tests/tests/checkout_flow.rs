//! Step navigation through the checkout API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use tajeer_core::funnel::{FunnelEvent, FunnelStep};
use tajeer_integration_tests::{TestApp, configuration, valid_customer};
use tajeer_storefront::test_support::FakeBackend;

#[tokio::test]
async fn test_full_checkout_records_every_funnel_step() {
    let mut app = TestApp::new();

    let started = app.start_checkout().await;
    assert_eq!(started.status, StatusCode::CREATED);
    assert_eq!(started.step(), "customer_info");
    assert_eq!(started.body["totals"]["monthly_price"]["display"], "SAR 240");
    let checkout_id = started.body["id"].as_str().unwrap().to_string();

    assert_eq!(app.submit_valid_customer().await.step(), "protection_plan");
    let protection = app
        .post("/api/checkout/protection", &json!({ "add_protection": true }))
        .await;
    assert_eq!(protection.step(), "verification_documents");
    let review = app.upload_valid_documents().await;
    assert_eq!(review.step(), "review");
    assert_eq!(review.body["totals"]["monthly_total"]["display"], "SAR 264");
    assert_eq!(review.body["totals"]["contract_total"]["display"], "SAR 6336");

    let submitted = app.post_empty("/api/checkout/submit").await;
    assert_eq!(submitted.status, StatusCode::OK);
    assert_eq!(submitted.body["confirmation"]["reference"], "TJ-1001");

    // Events are recorded off the request path, so arrival order is not fixed.
    let mut events: Vec<FunnelEvent> = app
        .wait_for_events(5)
        .await
        .into_iter()
        .filter(|e| e.session_id.to_string() == checkout_id)
        .collect();
    events.sort_by_key(|e| e.occurred_at);
    let steps: Vec<FunnelStep> = events.into_iter().map(|e| e.step).collect();
    assert_eq!(
        steps,
        vec![
            FunnelStep::CheckoutStarted,
            FunnelStep::ProtectionPlan,
            FunnelStep::VerificationDocuments,
            FunnelStep::Review,
            FunnelStep::OrderSubmitted,
        ]
    );
}

#[tokio::test]
async fn test_returning_to_step_one_records_customer_info() {
    let mut app = TestApp::new();
    app.start_checkout().await;
    app.submit_valid_customer().await;

    let back = app.post_empty("/api/checkout/back").await;
    assert_eq!(back.step(), "customer_info");

    let steps: Vec<FunnelStep> = app
        .wait_for_events(3)
        .await
        .into_iter()
        .map(|e| e.step)
        .collect();
    assert_eq!(steps.len(), 3);
    assert!(steps.contains(&FunnelStep::CustomerInfo));
}

#[tokio::test]
async fn test_every_step_succeeds_while_funnel_is_down() {
    let backend = FakeBackend::with_catalog();
    backend.fail_funnel();
    let mut app = TestApp::with_backend(backend);

    assert_eq!(app.start_checkout().await.status, StatusCode::CREATED);
    assert_eq!(app.submit_valid_customer().await.status, StatusCode::OK);
    let back = app.post_empty("/api/checkout/back").await;
    assert_eq!(back.status, StatusCode::OK);
    let advanced = app.post_empty("/api/checkout/advance").await;
    assert_eq!(advanced.status, StatusCode::OK);
    assert_eq!(advanced.step(), "protection_plan");
    let protection = app
        .post("/api/checkout/protection", &json!({ "add_protection": true }))
        .await;
    assert_eq!(protection.status, StatusCode::OK);
    let review = app.upload_valid_documents().await;
    assert_eq!(review.status, StatusCode::OK);
    assert_eq!(review.step(), "review");
    let submitted = app.post_empty("/api/checkout/submit").await;
    assert_eq!(submitted.status, StatusCode::OK);
    assert_eq!(app.delete("/api/checkout").await.status, StatusCode::NO_CONTENT);

    assert!(app.backend.recorded_events().is_empty());
}

#[tokio::test]
async fn test_invalid_customer_stays_on_step_one() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app
        .post(
            "/api/checkout/customer",
            &json!({
                "full_name": "S",
                "email": "not-an-email",
                "phone": "0501234567",
                "order_type": "individual",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.code(), "validation_failed");
    let fields: Vec<&str> = response.body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["full_name", "email"]);

    let current = app.get("/api/checkout").await;
    assert_eq!(current.step(), "customer_info");
}

#[tokio::test]
async fn test_field_errors_follow_the_requested_language() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app
        .post(
            "/api/checkout/customer?lang=ar",
            &json!({
                "full_name": "Sara Alqahtani",
                "email": "sara@example.sa",
                "phone": "0501234567",
                "order_type": "business",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["fields"][0]["field"], "business_name");
    assert_eq!(response.body["fields"][0]["message"], "يرجى إدخال اسم المنشأة");
}

#[tokio::test]
async fn test_back_and_forward_keeps_captured_data() {
    let mut app = TestApp::new();
    let review = app.checkout_at_review(false).await;

    let back = app.post_empty("/api/checkout/back").await;
    assert_eq!(back.step(), "verification_documents");
    let back = app.post_empty("/api/checkout/back").await;
    assert_eq!(back.step(), "protection_plan");
    assert_eq!(back.body["add_protection"], false);

    app.post_empty("/api/checkout/advance").await;
    let forward = app.post_empty("/api/checkout/advance").await;

    assert_eq!(forward.step(), "review");
    assert_eq!(forward.body["configuration"], review.body["configuration"]);
    assert_eq!(forward.body["customer"], review.body["customer"]);
    assert_eq!(forward.body["documents"], review.body["documents"]);
}

#[tokio::test]
async fn test_back_from_first_step_is_refused() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app.post_empty("/api/checkout/back").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.code(), "at_first_step");
}

#[tokio::test]
async fn test_advance_without_data_is_refused() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app.post_empty("/api/checkout/advance").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.code(), "step_incomplete");
}

#[tokio::test]
async fn test_out_of_order_step_is_refused() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app
        .post("/api/checkout/protection", &json!({ "add_protection": true }))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.code(), "wrong_step");
}

#[tokio::test]
async fn test_protection_choice_is_required() {
    let mut app = TestApp::new();
    app.start_checkout().await;
    app.submit_valid_customer().await;

    let response = app.post("/api/checkout/protection", &json!({})).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["fields"][0]["field"], "add_protection");
}

#[tokio::test]
async fn test_step_without_checkout_is_not_found() {
    let mut app = TestApp::new();

    let response = app.post("/api/checkout/customer", &valid_customer()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.code(), "no_checkout");
}

#[tokio::test]
async fn test_checkout_is_tied_to_the_session_cookie() {
    let mut app = TestApp::new();
    app.start_checkout().await;
    app.clear_cookies();

    let response = app.get("/api/checkout").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_abandon_clears_the_checkout() {
    let mut app = TestApp::new();
    app.start_checkout().await;
    app.submit_valid_customer().await;

    let response = app.delete("/api/checkout").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let mut events = app.wait_for_events(3).await;
    events.sort_by_key(|e| e.occurred_at);
    assert_eq!(events.last().unwrap().step, FunnelStep::CheckoutAbandoned);
    assert_eq!(app.get("/api/checkout").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restart_replaces_the_checkout() {
    let mut app = TestApp::new();
    let first = app.start_checkout().await;
    app.submit_valid_customer().await;

    let second = app
        .post("/api/checkout", &configuration("refurbished", "24_months"))
        .await;

    assert_eq!(second.status, StatusCode::CREATED);
    assert_ne!(second.body["id"], first.body["id"]);
    assert_eq!(second.step(), "customer_info");
    assert_eq!(second.body["customer"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_submitted_checkout_is_terminal() {
    let mut app = TestApp::new();
    app.checkout_at_review(false).await;
    assert_eq!(app.post_empty("/api/checkout/submit").await.status, StatusCode::OK);

    let again = app.post_empty("/api/checkout/submit").await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.code(), "already_submitted");

    let back = app.post_empty("/api/checkout/back").await;
    assert_eq!(back.code(), "already_submitted");
    assert_eq!(app.backend.created_orders().len(), 1);
}

#[tokio::test]
async fn test_arabic_checkout_is_right_to_left() {
    let mut app = TestApp::new();

    let response = app
        .post("/api/checkout?lang=ar", &configuration("new", "24_months"))
        .await;

    assert_eq!(response.body["locale"], "ar");
    assert_eq!(response.body["direction"], "rtl");
    assert_eq!(response.body["totals"]["monthly_price"]["display"], "٢٤٠ ر.س");
    assert_eq!(response.body["configuration"]["color"], "جرافيت");
}
