use super::AnalyticsTransport;
use crate::event_logging::analytics_event::{IdentifyPayload, PagePayload, TrackPayload};
use crate::event_logging::event_queue::CompletionCallback;
use crate::{log_e, log_i, AnalyticsErr};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

const TAG: &str = stringify!(OutputLoggerTransport);

/// Writes every call to the output logger as JSON and acknowledges tracked
/// events right away. Nothing is buffered, so `flush` has no work to do.
#[derive(Default)]
pub struct OutputLoggerTransport {
    tracked_count: AtomicU64,
    paged_count: AtomicU64,
    identified_count: AtomicU64,
}

impl OutputLoggerTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_count(&self) -> u64 {
        self.tracked_count.load(Ordering::SeqCst)
    }

    pub fn paged_count(&self) -> u64 {
        self.paged_count.load(Ordering::SeqCst)
    }

    pub fn identified_count(&self) -> u64 {
        self.identified_count.load(Ordering::SeqCst)
    }

    fn write<T: Serialize>(&self, kind: &str, payload: &T) {
        match to_json(payload) {
            Ok(json) => log_i!(TAG, "{}: {}", kind, json),
            Err(e) => log_e!(TAG, "Failed to write {}: {}", kind, e),
        }
    }
}

#[async_trait]
impl AnalyticsTransport for OutputLoggerTransport {
    fn track(&self, payload: TrackPayload, callback: Option<CompletionCallback>) {
        self.write("track", &payload);
        self.tracked_count.fetch_add(1, Ordering::SeqCst);

        if let Some(callback) = callback {
            callback();
        }
    }

    fn page(&self, payload: PagePayload) {
        self.write("page", &payload);
        self.paged_count.fetch_add(1, Ordering::SeqCst);
    }

    fn identify(&self, payload: IdentifyPayload) {
        self.write("identify", &payload);
        self.identified_count.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}

    async fn shutdown(&self) -> Result<(), AnalyticsErr> {
        Ok(())
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<String, AnalyticsErr> {
    serde_json::to_string(payload).map_err(|e| AnalyticsErr::SerializationError(e.to_string()))
}
