//! In-memory backend and fixtures for tests.
//!
//! Compiled for this crate's tests and, through the `test-support` feature,
//! for the integration test crate.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tajeer_core::checkout::{
    CustomerInfoForm, DocumentKind, DocumentUpload, NewOrder, OrderDraft, OrderReceipt, OrderType,
};
use tajeer_core::funnel::FunnelEvent;
use tajeer_core::{
    CheckoutConfig, CheckoutSession, ColorOption, ColorOptionId, Condition, CurrencyCode,
    LeaseTerm, Locale, OrderId, Price, Product, ProductConfiguration, ProductId, StorageOption,
    StorageOptionId, TermPrices,
};
use url::Url;
use uuid::Uuid;

use crate::backend::{
    BackendError, Backends, CatalogLookup, DocumentStorage, FunnelRecorder, OrderCreation,
    PriceKey, PricingLookup,
};
use crate::config::{BackendConfig, LogFormat, StorefrontConfig};
use crate::services::{StagedDocuments, StagedFile};
use crate::state::AppState;

/// Smallest byte strings that pass signature checks.
pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\ntrailer\n";
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unavailable() -> BackendError {
    BackendError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

// =============================================================================
// FakeBackend
// =============================================================================

/// Backend that keeps everything in memory and can be told to fail.
#[derive(Default)]
pub struct FakeBackend {
    products: Mutex<HashMap<ProductId, Product>>,
    prices: Mutex<HashMap<PriceKey, Decimal>>,
    uploads: Mutex<Vec<String>>,
    orders: Mutex<Vec<NewOrder>>,
    receipts: Mutex<Vec<OrderReceipt>>,
    events: Mutex<Vec<FunnelEvent>>,
    failing_upload: Mutex<Option<DocumentKind>>,
    failing_orders: AtomicBool,
    failing_pricing: AtomicBool,
    failing_funnel: AtomicBool,
}

impl FakeBackend {
    /// A backend whose catalog holds [`phone_product`].
    #[must_use]
    pub fn with_catalog() -> Self {
        let backend = Self::default();
        backend.add_product(phone_product());
        backend
    }

    pub fn add_product(&self, product: Product) {
        locked(&self.products).insert(product.id, product);
    }

    pub fn set_price(&self, key: PriceKey, price: Decimal) {
        locked(&self.prices).insert(key, price);
    }

    pub fn fail_uploads_for(&self, kind: DocumentKind) {
        *locked(&self.failing_upload) = Some(kind);
    }

    pub fn fail_orders(&self) {
        self.failing_orders.store(true, Ordering::SeqCst);
    }

    pub fn fail_pricing(&self) {
        self.failing_pricing.store(true, Ordering::SeqCst);
    }

    pub fn fail_funnel(&self) {
        self.failing_funnel.store(true, Ordering::SeqCst);
    }

    /// Clear every failure switch.
    pub fn recover(&self) {
        *locked(&self.failing_upload) = None;
        self.failing_orders.store(false, Ordering::SeqCst);
        self.failing_pricing.store(false, Ordering::SeqCst);
        self.failing_funnel.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn uploaded_paths(&self) -> Vec<String> {
        locked(&self.uploads).clone()
    }

    #[must_use]
    pub fn created_orders(&self) -> Vec<NewOrder> {
        locked(&self.orders).clone()
    }

    #[must_use]
    pub fn last_receipt(&self) -> Option<OrderReceipt> {
        locked(&self.receipts).last().cloned()
    }

    #[must_use]
    pub fn recorded_events(&self) -> Vec<FunnelEvent> {
        locked(&self.events).clone()
    }
}

#[async_trait]
impl CatalogLookup for FakeBackend {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        Ok(locked(&self.products).get(&id).cloned())
    }
}

#[async_trait]
impl PricingLookup for FakeBackend {
    async fn authoritative_price(&self, key: &PriceKey) -> Result<Option<Decimal>, BackendError> {
        if self.failing_pricing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(locked(&self.prices).get(key).copied())
    }
}

#[async_trait]
impl DocumentStorage for FakeBackend {
    async fn upload_document(
        &self,
        path: &str,
        _content_type: &str,
        _contents: Bytes,
    ) -> Result<String, BackendError> {
        let failing = *locked(&self.failing_upload);
        if failing.is_some_and(|kind| path.contains(kind.as_str())) {
            return Err(unavailable());
        }
        locked(&self.uploads).push(path.to_string());
        Ok(path.to_string())
    }
}

#[async_trait]
impl OrderCreation for FakeBackend {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderReceipt, BackendError> {
        if self.failing_orders.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut orders = locked(&self.orders);
        orders.push(order.clone());
        let receipt = OrderReceipt {
            order_id: OrderId::new_random(),
            order_number: Some(format!("TJ-{:04}", 1000 + orders.len())),
        };
        locked(&self.receipts).push(receipt.clone());
        Ok(receipt)
    }
}

#[async_trait]
impl FunnelRecorder for FakeBackend {
    async fn record_event(&self, event: &FunnelEvent) -> Result<(), BackendError> {
        if self.failing_funnel.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        locked(&self.events).push(event.clone());
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const PRODUCT_ID: ProductId = ProductId::from_uuid(Uuid::from_u128(1));
pub const STORAGE_128_ID: StorageOptionId = StorageOptionId::from_uuid(Uuid::from_u128(11));
pub const STORAGE_256_ID: StorageOptionId = StorageOptionId::from_uuid(Uuid::from_u128(12));
pub const GRAPHITE_ID: ColorOptionId = ColorOptionId::from_uuid(Uuid::from_u128(21));

/// Base 300 SAR, 128 GB (+0) and 256 GB (+20), one color.
#[must_use]
pub fn phone_product() -> Product {
    Product {
        id: PRODUCT_ID,
        name: "Galaxy S24".to_string(),
        name_ar: Some("جالكسي S24".to_string()),
        image_url: None,
        base_price: Decimal::from(300),
        currency_code: CurrencyCode::SAR,
        storage_options: vec![
            StorageOption {
                id: STORAGE_128_ID,
                label: "128 GB".to_string(),
                price_modifier: Decimal::ZERO,
                exact_prices: TermPrices::default(),
            },
            StorageOption {
                id: STORAGE_256_ID,
                label: "256 GB".to_string(),
                price_modifier: Decimal::from(20),
                exact_prices: TermPrices::default(),
            },
        ],
        color_options: vec![ColorOption {
            id: GRAPHITE_ID,
            name: "Graphite".to_string(),
            name_ar: Some("جرافيت".to_string()),
            hex: Some("#41424c".to_string()),
            price_modifier: Decimal::ZERO,
        }],
    }
}

#[must_use]
pub fn customer_form() -> CustomerInfoForm {
    CustomerInfoForm {
        full_name: "Sara Alqahtani".to_string(),
        email: "sara@example.sa".to_string(),
        phone: "0501234567".to_string(),
        order_type: OrderType::Individual,
        business_name: None,
    }
}

#[must_use]
pub fn national_id_file() -> StagedFile {
    StagedFile {
        upload: DocumentUpload::validate(DocumentKind::NationalId, "id.pdf", None, PDF_BYTES)
            .unwrap_or_else(|e| panic!("fixture rejected: {e}")),
        contents: Bytes::from_static(PDF_BYTES),
    }
}

#[must_use]
pub fn salary_certificate_file() -> StagedFile {
    StagedFile {
        upload: DocumentUpload::validate(
            DocumentKind::SalaryCertificate,
            "salary.jpg",
            None,
            JPEG_BYTES,
        )
        .unwrap_or_else(|e| panic!("fixture rejected: {e}")),
        contents: Bytes::from_static(JPEG_BYTES),
    }
}

#[must_use]
pub fn staged_documents() -> StagedDocuments {
    StagedDocuments {
        national_id: Some(national_id_file()),
        salary_certificate: Some(salary_certificate_file()),
    }
}

/// A session on step 4: 256 GB, 24 months, new, 240 SAR, with protection.
#[must_use]
pub fn session_at_review() -> CheckoutSession {
    let product = phone_product();
    let config = ProductConfiguration::from_ids(
        &product,
        Some(STORAGE_256_ID),
        Some(GRAPHITE_ID),
        Condition::New,
        Some(LeaseTerm::TwentyFourMonths),
    )
    .and_then(|config| {
        CheckoutConfig::snapshot(&product, &config, Price::from_amount(Decimal::from(240)))
    })
    .unwrap_or_else(|e| panic!("fixture configuration rejected: {e}"));

    let mut session = CheckoutSession::start(config, Locale::En);
    let steps = [
        session.submit_customer_info(&customer_form()),
        session.choose_protection(Some(true)),
        session.attach_documents(
            Some(national_id_file().upload),
            Some(salary_certificate_file().upload),
        ),
    ];
    for step in steps {
        if let Err(e) = step {
            panic!("fixture step rejected: {e}");
        }
    }
    session
}

#[must_use]
pub fn order_draft() -> OrderDraft {
    session_at_review()
        .order_draft()
        .unwrap_or_else(|e| panic!("fixture draft rejected: {e}"))
}

/// Configuration pointing at an address nothing listens on.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        backend: BackendConfig {
            url: Url::parse("http://127.0.0.1:9").unwrap_or_else(|e| panic!("{e}")),
            api_key: SecretString::from("sb9Kq2mZ7xPfL4wR8tYc3VnJ6hD1gA5e"),
            documents_bucket: "verification-documents".to_string(),
            price_cache_ttl: Duration::from_secs(300),
        },
        document_staging_ttl: Duration::from_secs(3600),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Application state wired to a fake backend.
#[must_use]
pub fn test_state(backend: Arc<FakeBackend>) -> AppState {
    AppState::with_backends(test_config(), Backends::uniform(backend))
}
