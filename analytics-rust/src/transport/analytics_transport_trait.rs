use crate::event_logging::analytics_event::{IdentifyPayload, PagePayload, TrackPayload};
use crate::event_logging::event_queue::CompletionCallback;
use crate::AnalyticsErr;
use async_trait::async_trait;

/// The call surface of an analytics client. Callers hold an
/// `Arc<dyn AnalyticsTransport>` and never depend on which variant sits
/// behind it.
#[async_trait]
pub trait AnalyticsTransport: Send + Sync {
    /// Records an event. `callback` fires once the event is considered sent,
    /// which may happen before `track` returns.
    fn track(&self, payload: TrackPayload, callback: Option<CompletionCallback>);

    fn page(&self, payload: PagePayload);

    fn identify(&self, payload: IdentifyPayload);

    /// Sends everything that is still pending.
    fn flush(&self);

    async fn shutdown(&self) -> Result<(), AnalyticsErr>;
}
