//! Integration tests for Tajeer.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`
//! against an in-memory backend, so no network or database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tajeer-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tajeer_storefront::backend::Backends;
use tajeer_storefront::config::StorefrontConfig;
use tajeer_storefront::test_support::{
    FakeBackend, GRAPHITE_ID, PRODUCT_ID, STORAGE_256_ID, test_config, test_state,
};
use tajeer_storefront::{AppState, build_router};
use tower::ServiceExt;

pub use tajeer_storefront::test_support::{JPEG_BYTES, PDF_BYTES};

const BOUNDARY: &str = "tajeer-test-boundary";

/// One file part of a multipart upload.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub contents: Vec<u8>,
}

impl<'a> FilePart<'a> {
    #[must_use]
    pub fn national_id_pdf() -> Self {
        Self {
            field: "national_id",
            file_name: "national-id.pdf",
            content_type: "application/pdf",
            contents: PDF_BYTES.to_vec(),
        }
    }

    #[must_use]
    pub fn salary_certificate_jpeg() -> Self {
        Self {
            field: "salary_certificate",
            file_name: "salary.jpg",
            content_type: "image/jpeg",
            contents: JPEG_BYTES.to_vec(),
        }
    }

    /// A PDF padded to `size` bytes.
    #[must_use]
    pub fn pdf_of_size(field: &'a str, size: usize) -> Self {
        let mut contents = PDF_BYTES.to_vec();
        contents.resize(size.max(contents.len()), b' ');
        Self {
            field,
            file_name: "large.pdf",
            content_type: "application/pdf",
            contents,
        }
    }
}

/// The storefront router plus the fake backend behind it, carrying the
/// session cookie between requests like a browser would.
pub struct TestApp {
    pub backend: Arc<FakeBackend>,
    router: Router,
    cookie: Option<HeaderValue>,
}

/// Status and JSON body of a response (`Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    #[must_use]
    pub fn step(&self) -> &str {
        self.body["step"].as_str().unwrap_or_default()
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// App over a backend whose catalog holds the test phone.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(FakeBackend::with_catalog())
    }

    #[must_use]
    pub fn with_backend(backend: FakeBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            router: build_router(test_state(backend.clone())),
            backend,
            cookie: None,
        }
    }

    /// App with a customized configuration, e.g. a short staging TTL.
    #[must_use]
    pub fn with_config(backend: FakeBackend, edit: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let backend = Arc::new(backend);
        let mut config = test_config();
        edit(&mut config);
        let state = AppState::with_backends(config, Backends::uniform(backend.clone()));
        Self {
            router: build_router(state),
            backend,
            cookie: None,
        }
    }

    /// Forget the session cookie, as a new browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(header::COOKIE, cookie.clone());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = Some(HeaderValue::from_str(&pair).unwrap());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_empty(&mut self, uri: &str) -> TestResponse {
        self.send(Request::post(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&mut self, uri: &str, parts: &[FilePart<'_>]) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    part.field, part.file_name, part.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(&part.contents);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Checkout shortcuts
    // -------------------------------------------------------------------------

    /// Start a checkout for 256 GB graphite, new, 24 months.
    pub async fn start_checkout(&mut self) -> TestResponse {
        self.post("/api/checkout", &configuration("new", "24_months"))
            .await
    }

    pub async fn submit_valid_customer(&mut self) -> TestResponse {
        self.post("/api/checkout/customer", &valid_customer()).await
    }

    pub async fn upload_valid_documents(&mut self) -> TestResponse {
        self.upload(
            "/api/checkout/documents",
            &[
                FilePart::national_id_pdf(),
                FilePart::salary_certificate_jpeg(),
            ],
        )
        .await
    }

    /// Drive a fresh checkout to step 4.
    pub async fn checkout_at_review(&mut self, add_protection: bool) -> TestResponse {
        assert_eq!(self.start_checkout().await.status, StatusCode::CREATED);
        assert_eq!(self.submit_valid_customer().await.status, StatusCode::OK);
        let protection = self
            .post(
                "/api/checkout/protection",
                &json!({ "add_protection": add_protection }),
            )
            .await;
        assert_eq!(protection.status, StatusCode::OK);
        let review = self.upload_valid_documents().await;
        assert_eq!(review.step(), "review");
        review
    }

    /// Wait until at least `count` funnel events were recorded.
    pub async fn wait_for_events(&self, count: usize) -> Vec<tajeer_core::funnel::FunnelEvent> {
        for _ in 0..100 {
            let events = self.backend.recorded_events();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.backend.recorded_events()
    }
}

/// Configuration request for the test phone.
#[must_use]
pub fn configuration(condition: &str, lease_term: &str) -> Value {
    json!({
        "product_id": PRODUCT_ID.to_string(),
        "storage_id": STORAGE_256_ID.to_string(),
        "color_id": GRAPHITE_ID.to_string(),
        "condition": condition,
        "lease_term": lease_term,
    })
}

#[must_use]
pub fn valid_customer() -> Value {
    json!({
        "full_name": "Sara Alqahtani",
        "email": "sara@example.sa",
        "phone": "0501234567",
        "order_type": "individual",
    })
}
