use analytics_rust::{
    AnalyticsErr, AnalyticsTransport, CompletionCallback, IdentifyPayload, PagePayload,
    TrackPayload,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Records every call. Tracked callbacks are held until `flush` or `shutdown`.
#[derive(Default)]
pub struct MockTransport {
    pub tracked: Mutex<Vec<TrackPayload>>,
    pub pages: Mutex<Vec<PagePayload>>,
    pub identifies: Mutex<Vec<IdentifyPayload>>,
    pub flush_count: AtomicUsize,
    pub shutdown_count: AtomicUsize,
    pub shutdown_delay: Option<Duration>,
    pending_callbacks: Mutex<Vec<CompletionCallback>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shutdown_delay(delay: Duration) -> Self {
        Self {
            shutdown_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn tracked_events(&self) -> Vec<TrackPayload> {
        self.tracked.lock().clone()
    }

    pub fn pending_callback_count(&self) -> usize {
        self.pending_callbacks.lock().len()
    }

    fn run_pending_callbacks(&self) {
        let callbacks = std::mem::take(&mut *self.pending_callbacks.lock());
        for callback in callbacks {
            callback();
        }
    }
}

#[async_trait]
impl AnalyticsTransport for MockTransport {
    fn track(&self, payload: TrackPayload, callback: Option<CompletionCallback>) {
        self.tracked.lock().push(payload);
        if let Some(callback) = callback {
            self.pending_callbacks.lock().push(callback);
        }
    }

    fn page(&self, payload: PagePayload) {
        self.pages.lock().push(payload);
    }

    fn identify(&self, payload: IdentifyPayload) {
        self.identifies.lock().push(payload);
    }

    fn flush(&self) {
        self.flush_count.fetch_add(1, Ordering::SeqCst);
        self.run_pending_callbacks();
    }

    async fn shutdown(&self) -> Result<(), AnalyticsErr> {
        if let Some(delay) = self.shutdown_delay {
            tokio::time::sleep(delay).await;
        }

        self.shutdown_count.fetch_add(1, Ordering::SeqCst);
        self.run_pending_callbacks();
        Ok(())
    }
}
