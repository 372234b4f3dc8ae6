//! Device and traffic source of the current visit.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tajeer_core::funnel::VisitContext;
use tower_sessions::Session;

use super::locale::query_param;
use super::session::session_keys;

/// Visit context, captured on the first request of a session and reused
/// afterwards so later steps keep the original referrer.
#[derive(Debug, Clone, Default)]
pub struct Visit(pub VisitContext);

impl Visit {
    #[must_use]
    pub fn from_parts(parts: &Parts) -> VisitContext {
        let header = |name| parts.headers.get(name).and_then(|h| h.to_str().ok());
        VisitContext::new(
            header(header::USER_AGENT),
            query_param(parts, "utm_source").as_deref(),
            header(header::REFERER),
        )
    }
}

impl<S> FromRequestParts<S> for Visit
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self(Self::from_parts(parts)));
        };

        if let Ok(Some(visit)) = session.get::<VisitContext>(session_keys::VISIT).await {
            return Ok(Self(visit));
        }

        let visit = Self::from_parts(parts);
        if let Err(e) = session.insert(session_keys::VISIT, &visit).await {
            tracing::warn!(error = %e, "Failed to store visit context");
        }
        Ok(Self(visit))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use tajeer_core::funnel::DeviceKind;

    use super::*;

    #[test]
    fn test_from_headers_and_query() {
        let parts = Request::builder()
            .uri("/api/checkout?utm_source=Instagram")
            .header(
                header::USER_AGENT,
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) Mobile/15E148",
            )
            .header(header::REFERER, "https://www.google.com/")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let visit = Visit::from_parts(&parts);
        assert_eq!(visit.device, DeviceKind::Mobile);
        assert_eq!(visit.source.as_deref(), Some("instagram"));
    }

    #[test]
    fn test_referrer_when_no_utm() {
        let parts = Request::builder()
            .uri("/api/checkout")
            .header(header::REFERER, "https://www.google.com/search?q=iphone")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let visit = Visit::from_parts(&parts);
        assert_eq!(visit.device, DeviceKind::Desktop);
        assert_eq!(visit.source.as_deref(), Some("google.com"));
    }
}
