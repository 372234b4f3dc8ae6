//! Verification document uploads (step 3).

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use tajeer_integration_tests::{FilePart, JPEG_BYTES, TestApp};

const FIVE_MB: usize = 5 * 1024 * 1024;

async fn app_at_documents() -> TestApp {
    let mut app = TestApp::new();
    app.start_checkout().await;
    app.submit_valid_customer().await;
    let response = app
        .post("/api/checkout/protection", &json!({ "add_protection": false }))
        .await;
    assert_eq!(response.step(), "verification_documents");
    app
}

#[tokio::test]
async fn test_valid_documents_move_to_review() {
    let mut app = app_at_documents().await;

    let response = app.upload_valid_documents().await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.step(), "review");
    assert_eq!(
        response.body["documents"]["national_id"]["file_name"],
        "national-id.pdf"
    );
    assert_eq!(
        response.body["documents"]["salary_certificate"]["file_name"],
        "salary.jpg"
    );
    // Nothing leaves the server before submission.
    assert!(app.backend.uploaded_paths().is_empty());
}

#[tokio::test]
async fn test_oversized_document_is_rejected() {
    let mut app = app_at_documents().await;

    let response = app
        .upload(
            "/api/checkout/documents",
            &[
                FilePart::pdf_of_size("national_id", 6 * 1024 * 1024),
                FilePart::salary_certificate_jpeg(),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.code(), "validation_failed");
    assert_eq!(response.body["fields"][0]["field"], "national_id");
    assert_eq!(response.body["fields"][0]["message"], "File must be 5 MB or smaller");

    let current = app.get("/api/checkout").await;
    assert_eq!(current.step(), "verification_documents");
}

#[tokio::test]
async fn test_document_at_the_limit_is_accepted() {
    let mut app = app_at_documents().await;

    let response = app
        .upload(
            "/api/checkout/documents",
            &[
                FilePart::pdf_of_size("national_id", FIVE_MB),
                FilePart::salary_certificate_jpeg(),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.step(), "review");
}

#[tokio::test]
async fn test_request_over_the_body_limit_is_rejected() {
    let mut app = app_at_documents().await;

    let response = app
        .upload(
            "/api/checkout/documents",
            &[
                FilePart::pdf_of_size("national_id", 7 * 1024 * 1024),
                FilePart::pdf_of_size("salary_certificate", 7 * 1024 * 1024),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "bad_request");

    let current = app.get("/api/checkout").await;
    assert_eq!(current.step(), "verification_documents");
    assert_eq!(current.body["documents"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_mismatched_file_type_is_rejected() {
    let mut app = app_at_documents().await;

    let response = app
        .upload(
            "/api/checkout/documents",
            &[
                FilePart {
                    field: "national_id",
                    file_name: "id.pdf",
                    content_type: "application/pdf",
                    contents: JPEG_BYTES.to_vec(),
                },
                FilePart::salary_certificate_jpeg(),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["fields"][0]["message"],
        "Only PDF, JPG and PNG files are accepted"
    );
}

#[tokio::test]
async fn test_every_bad_document_is_reported() {
    let mut app = app_at_documents().await;

    let response = app
        .upload(
            "/api/checkout/documents?lang=ar",
            &[
                FilePart::pdf_of_size("national_id", FIVE_MB + 1),
                FilePart {
                    field: "salary_certificate",
                    file_name: "salary.txt",
                    content_type: "text/plain",
                    contents: b"hello".to_vec(),
                },
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["fields"].as_array().unwrap().len(), 2);
    assert_eq!(
        response.body["fields"][0]["message"],
        "يجب ألا يتجاوز حجم الملف ٥ ميجابايت"
    );
}

#[tokio::test]
async fn test_missing_document_is_required() {
    let mut app = app_at_documents().await;

    let response = app
        .upload("/api/checkout/documents", &[FilePart::national_id_pdf()])
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["fields"][0]["field"], "salary_certificate");
    assert_eq!(response.body["fields"][0]["message"], "Please upload this document");
}

#[tokio::test]
async fn test_return_visit_replaces_only_the_new_document() {
    let mut app = app_at_documents().await;
    app.upload_valid_documents().await;
    app.post_empty("/api/checkout/back").await;

    let response = app
        .upload(
            "/api/checkout/documents",
            &[FilePart {
                field: "salary_certificate",
                file_name: "salary-2024.pdf",
                content_type: "application/pdf",
                contents: tajeer_integration_tests::PDF_BYTES.to_vec(),
            }],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.step(), "review");
    assert_eq!(
        response.body["documents"]["national_id"]["file_name"],
        "national-id.pdf"
    );
    assert_eq!(
        response.body["documents"]["salary_certificate"]["file_name"],
        "salary-2024.pdf"
    );

    app.post_empty("/api/checkout/submit").await;
    let paths = app.backend.uploaded_paths();
    assert!(paths.iter().any(|p| p.ends_with("national_id.pdf")));
    assert!(paths.iter().any(|p| p.ends_with("salary_certificate.pdf")));
}

#[tokio::test]
async fn test_documents_before_step_three_are_refused() {
    let mut app = TestApp::new();
    app.start_checkout().await;

    let response = app.upload_valid_documents().await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.code(), "wrong_step");
}
