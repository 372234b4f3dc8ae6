//! Product and quote endpoints, and how checkout prices follow them.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use tajeer_core::{Condition, LeaseTerm};
use tajeer_integration_tests::{TestApp, configuration};
use tajeer_storefront::backend::PriceKey;
use tajeer_storefront::test_support::{
    FakeBackend, GRAPHITE_ID, PRODUCT_ID, STORAGE_256_ID, phone_product,
};

fn key(condition: Condition, lease_term: LeaseTerm) -> PriceKey {
    PriceKey {
        product_id: PRODUCT_ID,
        storage_id: STORAGE_256_ID,
        color_id: GRAPHITE_ID,
        condition,
        lease_term,
    }
}

#[tokio::test]
async fn test_refurbished_quote_uses_fallback_rules() {
    let mut app = TestApp::new();

    let response = app
        .post("/api/quote", &configuration("refurbished", "24_months"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["monthly"]["display"], "SAR 192");
    assert_eq!(response.body["source"], "modified_base_price");
    assert_eq!(response.body["badge"]["kind"], "refurbished");
    assert_eq!(response.body["badge"]["label"], "Refurbished: save 20%");
}

#[tokio::test]
async fn test_new_quote_shows_term_savings() {
    let mut app = TestApp::new();

    let response = app.post("/api/quote", &configuration("new", "24_months")).await;

    assert_eq!(response.body["monthly"]["display"], "SAR 240");
    assert_eq!(response.body["badge"]["label"], "20% off");
    assert_eq!(response.body["protection"]["display"], "SAR 24");
}

#[tokio::test]
async fn test_quote_in_arabic() {
    let mut app = TestApp::new();

    let response = app
        .post("/api/quote?lang=ar", &configuration("refurbished", "24_months"))
        .await;

    assert_eq!(response.body["monthly"]["display"], "١٩٢ ر.س");
}

#[tokio::test]
async fn test_authoritative_price_wins() {
    let backend = FakeBackend::with_catalog();
    backend.set_price(
        key(Condition::New, LeaseTerm::TwentyFourMonths),
        Decimal::from(199),
    );
    let mut app = TestApp::with_backend(backend);

    let response = app.post("/api/quote", &configuration("new", "24_months")).await;

    assert_eq!(response.body["monthly"]["display"], "SAR 199");
    assert_eq!(response.body["source"], "authoritative");
}

#[tokio::test]
async fn test_zero_authoritative_price_is_ignored() {
    let backend = FakeBackend::with_catalog();
    backend.set_price(key(Condition::New, LeaseTerm::TwentyFourMonths), Decimal::ZERO);
    let mut app = TestApp::with_backend(backend);

    let response = app.post("/api/quote", &configuration("new", "24_months")).await;

    assert_eq!(response.body["monthly"]["display"], "SAR 240");
    assert_eq!(response.body["source"], "modified_base_price");
}

#[tokio::test]
async fn test_storage_term_price_applies_before_base_price() {
    let backend = FakeBackend::default();
    let mut product = phone_product();
    product.storage_options[1].exact_prices.twenty_four_months = Some(Decimal::from(199));
    backend.add_product(product);
    let mut app = TestApp::with_backend(backend);

    let new = app.post("/api/quote", &configuration("new", "24_months")).await;
    assert_eq!(new.body["monthly"]["display"], "SAR 199");
    assert_eq!(new.body["source"], "storage_term_price");

    let refurbished = app
        .post("/api/quote", &configuration("refurbished", "24_months"))
        .await;
    assert_eq!(refurbished.body["monthly"]["display"], "SAR 160");
}

#[tokio::test]
async fn test_pricing_outage_falls_back() {
    let backend = FakeBackend::with_catalog();
    backend.fail_pricing();
    let mut app = TestApp::with_backend(backend);

    let response = app
        .post("/api/quote", &configuration("refurbished", "24_months"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["monthly"]["display"], "SAR 192");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut app = TestApp::with_backend(FakeBackend::default());

    let response = app.post("/api/quote", &configuration("new", "24_months")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.code(), "product_not_found");
}

#[tokio::test]
async fn test_incomplete_configuration_is_rejected() {
    let mut app = TestApp::new();

    let response = app
        .post(
            "/api/quote",
            &json!({
                "product_id": PRODUCT_ID.to_string(),
                "storage_id": STORAGE_256_ID.to_string(),
                "color_id": GRAPHITE_ID.to_string(),
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.code(), "invalid_configuration");

    let checkout = app
        .post(
            "/api/checkout",
            &json!({ "product_id": PRODUCT_ID.to_string(), "lease_term": "12_months" }),
        )
        .await;
    assert_eq!(checkout.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_product_lists_lease_terms() {
    let mut app = TestApp::new();

    let response = app.get(&format!("/api/products/{PRODUCT_ID}?lang=ar")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["display_name"], "جالكسي S24");
    assert_eq!(response.body["storage_options"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["lease_terms"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_checkout_picks_up_a_late_authoritative_price() {
    let mut app = TestApp::new();
    let started = app.start_checkout().await;
    assert_eq!(started.body["totals"]["monthly_price"]["display"], "SAR 240");

    app.backend.set_price(
        key(Condition::New, LeaseTerm::TwentyFourMonths),
        Decimal::from(229),
    );
    let current = app.get("/api/checkout").await;

    assert_eq!(current.body["totals"]["monthly_price"]["display"], "SAR 229");
}
