//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Catalog
//! GET    /api/products/{id}       - Product with storage and color options
//! POST   /api/quote               - Monthly price for a configuration
//!
//! # Checkout (JSON, state kept in the session)
//! POST   /api/checkout            - Start checkout from a complete configuration
//! GET    /api/checkout            - Current checkout
//! DELETE /api/checkout            - Abandon checkout
//! POST   /api/checkout/customer   - Step 1: customer details
//! POST   /api/checkout/protection - Step 2: protection plan choice
//! POST   /api/checkout/documents  - Step 3: verification documents (multipart)
//! POST   /api/checkout/advance    - Forward using data captured earlier
//! POST   /api/checkout/back       - Back one step
//! POST   /api/checkout/submit     - Step 4: upload documents and place the order
//! ```
//!
//! Every `/api` route honors `?lang=en|ar` and `Accept-Language`.

pub mod checkout;
pub mod quote;
pub mod views;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tajeer_core::checkout::MAX_DOCUMENT_BYTES;

use crate::state::AppState;

/// Two maximum-size documents plus multipart overhead.
#[allow(clippy::cast_possible_truncation)]
const MAX_DOCUMENTS_REQUEST_BYTES: usize = 2 * MAX_DOCUMENT_BYTES as usize + 1024 * 1024;

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(checkout::start)
                .get(checkout::show)
                .delete(checkout::abandon),
        )
        .route("/customer", post(checkout::customer))
        .route("/protection", post(checkout::protection))
        .route(
            "/documents",
            post(checkout::documents).layer(DefaultBodyLimit::max(MAX_DOCUMENTS_REQUEST_BYTES)),
        )
        .route("/advance", post(checkout::advance))
        .route("/back", post(checkout::back))
        .route("/submit", post(checkout::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/products/{id}", get(quote::product))
        .route("/api/quote", post(quote::quote))
        .nest("/api/checkout", checkout_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
