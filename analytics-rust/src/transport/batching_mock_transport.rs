use super::AnalyticsTransport;
use crate::event_logging::analytics_event::{IdentifyPayload, PagePayload, TrackPayload};
use crate::event_logging::event_queue::{BatchQueue, CompletionCallback, FlushAt, QueuedEvent};
use crate::event_logging::flush_timer::FlushTimer;
use crate::event_logging::flush_type::FlushType;
use crate::{log_d, AnalyticsErr, AnalyticsOptions, AnalyticsRuntime};
use async_trait::async_trait;
use std::sync::Arc;

const TAG: &str = stringify!(BatchingMockTransport);

/// Stands in for a real analytics transport. Tracked events are queued and
/// "sent" by invoking their callbacks, either when `flush_at` events are
/// pending or when the flush interval elapses. Nothing leaves the process.
pub struct BatchingMockTransport {
    queue: Arc<BatchQueue>,
    flush_timer: FlushTimer,
}

impl BatchingMockTransport {
    #[must_use]
    pub fn new(flush_at: FlushAt, flush_interval_ms: u64) -> Self {
        let runtime = AnalyticsRuntime::get_runtime();
        Self::with_runtime(flush_at, flush_interval_ms, &runtime)
    }

    #[must_use]
    pub fn from_options(options: &AnalyticsOptions) -> Self {
        Self::new(
            options.resolved_flush_at(),
            options.resolved_flush_interval_ms(),
        )
    }

    #[must_use]
    pub fn with_runtime(
        flush_at: FlushAt,
        flush_interval_ms: u64,
        runtime: &Arc<AnalyticsRuntime>,
    ) -> Self {
        let queue = Arc::new(BatchQueue::new(flush_at));
        let flush_timer = FlushTimer::start(&queue, flush_interval_ms, runtime);

        log_d!(
            TAG,
            "Created with flush_at={:?} flush_interval_ms={}",
            queue.flush_at(),
            flush_timer.interval_ms()
        );

        Self { queue, flush_timer }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn flush_at(&self) -> FlushAt {
        self.queue.flush_at()
    }

    pub fn flush_timer(&self) -> &FlushTimer {
        &self.flush_timer
    }

    /// Stops the interval flush. Queued events stay queued until `flush`.
    pub fn dispose(&self) {
        self.flush_timer.stop();
    }
}

#[async_trait]
impl AnalyticsTransport for BatchingMockTransport {
    fn track(&self, payload: TrackPayload, callback: Option<CompletionCallback>) {
        let event = match callback {
            Some(on_complete) => QueuedEvent::new(payload, on_complete),
            None => QueuedEvent::without_callback(payload),
        };
        self.queue.enqueue(event);
    }

    // noop, nothing awaits page or identify
    fn page(&self, _payload: PagePayload) {}

    fn identify(&self, _payload: IdentifyPayload) {}

    fn flush(&self) {
        self.queue.flush(FlushType::Manual);
    }

    async fn shutdown(&self) -> Result<(), AnalyticsErr> {
        self.flush_timer.stop_and_wait().await?;
        self.queue.flush(FlushType::Shutdown);
        Ok(())
    }
}
