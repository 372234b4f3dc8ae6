//! Fire-and-forget funnel tracking.

use std::sync::Arc;

use tajeer_core::funnel::FunnelEvent;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

use crate::backend::FunnelRecorder;

/// Records funnel events without blocking the request.
#[derive(Clone)]
pub struct FunnelService {
    recorder: Arc<dyn FunnelRecorder>,
}

impl FunnelService {
    #[must_use]
    pub fn new(recorder: Arc<dyn FunnelRecorder>) -> Self {
        Self { recorder }
    }

    /// Record `event` in the background. Failures are only logged.
    ///
    /// The returned handle may be dropped.
    pub fn record(&self, event: FunnelEvent) -> JoinHandle<()> {
        let recorder = self.recorder.clone();
        let span = info_span!("funnel_event", step = %event.step, session_id = %event.session_id);

        tokio::spawn(
            async move {
                match recorder.record_event(&event).await {
                    Ok(()) => debug!("Funnel event recorded"),
                    Err(e) => warn!(error = %e, "Failed to record funnel event"),
                }
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tajeer_core::funnel::{FunnelStep, VisitContext};
    use tajeer_core::{CheckoutId, Locale};

    use super::*;
    use crate::test_support::FakeBackend;

    #[tokio::test]
    async fn test_records_in_background() {
        let backend = Arc::new(FakeBackend::default());
        let service = FunnelService::new(backend.clone());
        let event = VisitContext::default().event(
            CheckoutId::new_random(),
            FunnelStep::CheckoutStarted,
            Locale::En,
        );

        service.record(event.clone()).await.unwrap();
        assert_eq!(backend.recorded_events(), vec![event]);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_funnel();
        let service = FunnelService::new(backend.clone());
        let event = VisitContext::default().event(
            CheckoutId::new_random(),
            FunnelStep::Review,
            Locale::Ar,
        );

        // The task completes normally even though recording failed.
        service.record(event).await.unwrap();
        assert!(backend.recorded_events().is_empty());
    }
}
