//! Checkout step handlers.
//!
//! The [`CheckoutSession`] is read from the session store at the start of
//! every request and written back only after a transition succeeded, so a
//! refused request never leaves a half-applied change behind.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::Field as MultipartField},
    http::StatusCode,
};
use serde::Deserialize;
use tajeer_core::checkout::{
    CustomerInfoForm, DocumentKind, DocumentUpload, FieldErrors, StepError,
};
use tajeer_core::funnel::{FunnelStep, VisitContext};
use tajeer_core::{CheckoutConfig, CheckoutSession, CheckoutStep, Locale};
use tower_sessions::Session;
use tracing::{info, instrument};

use super::quote::{ConfigurationRequest, quote_request};
use super::views::CheckoutView;
use crate::error::{AppError, Localize, Result, add_breadcrumb, set_sentry_checkout};
use crate::middleware::{RequestLocale, Visit, session_keys};
use crate::services::{StagedFile, SubmissionError};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

async fn load(session: &Session, locale: Locale) -> Result<CheckoutSession> {
    session
        .get::<CheckoutSession>(session_keys::CHECKOUT)
        .await
        .localize(locale)?
        .ok_or_else(|| AppError::NoCheckout.localized(locale))
}

async fn save(session: &Session, checkout: &CheckoutSession) -> Result<()> {
    session
        .insert(session_keys::CHECKOUT, checkout)
        .await
        .localize(checkout.locale())
}

/// Record arrival on a new step.
fn arrived(state: &AppState, visit: &VisitContext, checkout: &CheckoutSession, from: CheckoutStep) {
    let to = checkout.step();
    if to == from {
        return;
    }
    info!(checkout_id = %checkout.id(), from = %from, to = %to, "Checkout step changed");
    add_breadcrumb(
        "checkout",
        "Step changed",
        Some(&[("from", from.funnel_step().as_str()), ("to", to.funnel_step().as_str())]),
    );
    state
        .funnel()
        .record(visit.event(checkout.id(), to.funnel_step(), checkout.locale()));
}

/// Load, apply a synchronous transition, save and render.
async fn transition<F>(
    state: &AppState,
    session: &Session,
    visit: &VisitContext,
    locale: Locale,
    apply: F,
) -> Result<Json<CheckoutView>>
where
    F: FnOnce(&mut CheckoutSession) -> std::result::Result<CheckoutStep, StepError>,
{
    let mut checkout = load(session, locale).await?;
    checkout.set_locale(locale);
    set_sentry_checkout(&checkout.id(), locale);

    let from = checkout.step();
    apply(&mut checkout).localize(locale)?;
    save(session, &checkout).await?;
    arrived(state, visit, &checkout, from);

    Ok(Json(CheckoutView::new(&checkout, locale)))
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/checkout`: freeze a configuration and open step 1.
///
/// The price is resolved here, never taken from the client.
#[instrument(skip(state, session, visit))]
pub async fn start(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
    Json(request): Json<ConfigurationRequest>,
) -> Result<(StatusCode, Json<CheckoutView>)> {
    let (product, config, quote) = quote_request(&state, &request, locale).await?;
    let frozen = CheckoutConfig::snapshot(&product, &config, quote.monthly).localize(locale)?;

    if let Ok(Some(previous)) = session.get::<CheckoutSession>(session_keys::CHECKOUT).await {
        state.staging().discard(previous.id()).await;
    }

    let checkout = CheckoutSession::start(frozen, locale);
    save(&session, &checkout).await?;
    set_sentry_checkout(&checkout.id(), locale);

    info!(checkout_id = %checkout.id(), product_id = %product.id, "Checkout started");
    state.funnel().record(visit.event(
        checkout.id(),
        FunnelStep::CheckoutStarted,
        locale,
    ));

    Ok((StatusCode::CREATED, Json(CheckoutView::new(&checkout, locale))))
}

/// `GET /api/checkout`
///
/// Re-quotes an open checkout so a price that changed since the snapshot,
/// such as an authoritative price that was unavailable at the start, is
/// shown before the order is placed.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    session: Session,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load(&session, locale).await?;

    if !checkout.is_submitted() {
        let config = checkout.config();
        let request = ConfigurationRequest {
            product_id: config.product_id,
            storage_id: Some(config.storage.id),
            color_id: Some(config.color.id),
            condition: config.condition,
            lease_term: Some(config.lease_term),
        };
        match quote_request(&state, &request, locale).await {
            Ok((_, _, quote)) if quote.monthly != checkout.config().price => {
                info!(
                    checkout_id = %checkout.id(),
                    old = %checkout.config().price,
                    new = %quote.monthly,
                    "Checkout price refreshed"
                );
                checkout.refresh_price(quote.monthly).localize(locale)?;
                save(&session, &checkout).await?;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e.error, "Could not re-quote checkout, keeping snapshot price");
            }
        }
    }

    Ok(Json(CheckoutView::new(&checkout, locale)))
}

/// `DELETE /api/checkout`
#[instrument(skip(state, session, visit))]
pub async fn abandon(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
) -> Result<StatusCode> {
    let checkout = session
        .remove::<CheckoutSession>(session_keys::CHECKOUT)
        .await
        .localize(locale)?;

    if let Some(checkout) = checkout {
        state.staging().discard(checkout.id()).await;
        if !checkout.is_submitted() {
            info!(checkout_id = %checkout.id(), step = %checkout.step(), "Checkout abandoned");
            state.funnel().record(visit.event(
                checkout.id(),
                FunnelStep::CheckoutAbandoned,
                locale,
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/checkout/customer`: step 1.
#[instrument(skip_all)]
pub async fn customer(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
    Json(form): Json<CustomerInfoForm>,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, &visit, locale, |checkout| {
        checkout.submit_customer_info(&form)
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct ProtectionRequest {
    /// `None` when the shopper picked neither option.
    pub add_protection: Option<bool>,
}

/// `POST /api/checkout/protection`: step 2.
#[instrument(skip(state, session, visit))]
pub async fn protection(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
    Json(request): Json<ProtectionRequest>,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, &visit, locale, |checkout| {
        checkout.choose_protection(request.add_protection)
    })
    .await
}

struct ReceivedFile {
    file_name: String,
    content_type: Option<String>,
    contents: Bytes,
}

async fn read_file(
    field: MultipartField<'_>,
    kind: DocumentKind,
) -> std::result::Result<Option<ReceivedFile>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let contents = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("{kind}: {}", e.body_text())))?;

    // Browsers send an empty part when no file was chosen.
    if file_name.is_empty() && contents.is_empty() {
        return Ok(None);
    }
    Ok(Some(ReceivedFile {
        file_name,
        content_type,
        contents,
    }))
}

/// `POST /api/checkout/documents`: step 3, multipart with `national_id` and
/// `salary_certificate` file fields.
///
/// Either file may be omitted on a return visit to keep the one uploaded
/// earlier. Every file is validated before anything is stored.
#[instrument(skip_all)]
pub async fn documents(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load(&session, locale).await?;
    checkout.set_locale(locale);
    set_sentry_checkout(&checkout.id(), locale);

    let mut files: Vec<StagedFile> = Vec::new();
    let mut errors = FieldErrors::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))
        .localize(locale)?
    {
        let Some(kind) = field.name().and_then(DocumentKind::from_field_name) else {
            continue;
        };
        let Some(file) = read_file(field, kind).await.localize(locale)? else {
            continue;
        };

        match DocumentUpload::validate(
            kind,
            &file.file_name,
            file.content_type.as_deref(),
            &file.contents,
        ) {
            Ok(upload) => {
                files.retain(|f| f.upload.kind != kind);
                files.push(StagedFile {
                    upload,
                    contents: file.contents,
                });
            }
            Err(e) => {
                info!(kind = %kind, error = %e, "Document rejected");
                errors.push(e.field_error());
            }
        }
    }

    if !errors.is_empty() {
        return Err(AppError::from(StepError::Invalid(errors)).localized(locale));
    }

    let upload = |kind: DocumentKind| {
        files
            .iter()
            .find(|f| f.upload.kind == kind)
            .map(|f| f.upload.clone())
    };
    let from = checkout.step();
    checkout
        .attach_documents(
            upload(DocumentKind::NationalId),
            upload(DocumentKind::SalaryCertificate),
        )
        .localize(locale)?;

    state.staging().stage(checkout.id(), files).await;
    save(&session, &checkout).await?;
    arrived(&state, &visit, &checkout, from);

    Ok(Json(CheckoutView::new(&checkout, locale)))
}

/// `POST /api/checkout/advance`: move forward with data captured earlier.
#[instrument(skip_all)]
pub async fn advance(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, &visit, locale, CheckoutSession::advance).await
}

/// `POST /api/checkout/back`
#[instrument(skip_all)]
pub async fn back(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, &visit, locale, CheckoutSession::back).await
}

/// `POST /api/checkout/submit`: step 4.
///
/// On an upload or order failure the session is left exactly as it was, on
/// step 4, so the shopper can retry. If the staged files are gone the
/// shopper is sent back to step 3.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Visit(visit): Visit,
    session: Session,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load(&session, locale).await?;
    checkout.set_locale(locale);
    set_sentry_checkout(&checkout.id(), locale);

    let draft = checkout.order_draft().localize(locale)?;
    let result = match state.staging().get(checkout.id()).await {
        Some(staged) => state.submission().submit(&draft, &staged).await,
        None => Err(SubmissionError::DocumentsExpired),
    };

    match result {
        Ok(receipt) => {
            checkout.mark_submitted(receipt).localize(locale)?;
            save(&session, &checkout).await?;
            state.staging().discard(checkout.id()).await;

            add_breadcrumb("checkout", "Order submitted", None);
            state.funnel().record(visit.event(
                checkout.id(),
                FunnelStep::OrderSubmitted,
                locale,
            ));
            Ok(Json(CheckoutView::new(&checkout, locale)))
        }
        Err(SubmissionError::DocumentsExpired) => {
            info!(checkout_id = %checkout.id(), "Staged documents missing, returning to step 3");
            let from = checkout.step();
            checkout.documents_expired().localize(locale)?;
            save(&session, &checkout).await?;
            arrived(&state, &visit, &checkout, from);
            Err(AppError::from(SubmissionError::DocumentsExpired).localized(locale))
        }
        Err(e) => Err(AppError::from(e).localized(locale)),
    }
}
