use crate::event_logging::analytics_constants::{AnalyticsConstants, METRICS_ANONYMOUS_ID};
use crate::event_logging::analytics_event::{IdentifyPayload, PagePayload, TrackPayload};
use crate::event_logging::event_queue::CompletionCallback;
use crate::event_logging::track_options::TrackOptions;
use crate::output_logger::initialize_simple_output_logger;
use crate::transport::{AnalyticsTransport, BatchingMockTransport};
use crate::{log_d, log_e, log_w, AnalyticsErr, AnalyticsOptions};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

const TAG: &str = stringify!(Analytics);
const BACKGROUND_ENVIRONMENT_TYPE: &str = "background";

pub struct Analytics {
    transport: Arc<dyn AnalyticsTransport>,
    metrics_id: Option<String>,
    options: Arc<AnalyticsOptions>,
}

impl Analytics {
    pub fn new(metrics_id: Option<&str>, options: Option<Arc<AnalyticsOptions>>) -> Self {
        let options = options.unwrap_or_default();

        initialize_simple_output_logger(&options.output_log_level);

        let transport: Arc<dyn AnalyticsTransport> = match &options.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(BatchingMockTransport::from_options(&options)),
        };

        log_d!(
            TAG,
            "Analytics created for environment {:?}",
            options.resolved_environment()
        );

        Self {
            transport,
            metrics_id: metrics_id.map(str::to_string),
            options,
        }
    }

    pub fn metrics_id(&self) -> Option<&str> {
        self.metrics_id.as_deref()
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    pub fn transport(&self) -> &Arc<dyn AnalyticsTransport> {
        &self.transport
    }

    pub fn track_event(&self, payload: TrackPayload, options: &TrackOptions) {
        self.track_event_with_callback(payload, options, || {});
    }

    /// `callback` fires once, after the transport has acknowledged every event
    /// produced by this call.
    pub fn track_event_with_callback<F>(
        &self,
        payload: TrackPayload,
        options: &TrackOptions,
        callback: F,
    ) where
        F: FnOnce() + Send + 'static,
    {
        let events = self.prepare_events(payload, options);
        let callbacks = split_completion_callback(events.len(), Box::new(callback));

        for (event, on_complete) in events.into_iter().zip(callbacks) {
            self.transport.track(event, Some(on_complete));
        }

        if options.flush_immediately {
            self.transport.flush();
        }
    }

    /// Resolves once the transport acknowledges the event. With batching
    /// enabled this can take up to the flush interval unless
    /// `flush_immediately` is set.
    pub async fn track_event_and_wait(
        &self,
        payload: TrackPayload,
        options: &TrackOptions,
    ) -> Result<(), AnalyticsErr> {
        let event_name = payload.event.clone();
        let (tx, rx) = oneshot::channel();

        self.track_event_with_callback(payload, options, move || {
            let _ = tx.send(());
        });

        rx.await
            .map_err(|_| AnalyticsErr::AcknowledgementDropped(event_name))
    }

    pub fn track_page(&self, mut payload: PagePayload) {
        if payload.page.is_none() {
            payload.page = Some(AnalyticsConstants::background_page_object());
        }

        match &self.metrics_id {
            Some(id) => payload.user_id = Some(id.clone()),
            None => payload.anonymous_id = Some(METRICS_ANONYMOUS_ID.to_string()),
        }

        self.transport.page(payload);
    }

    pub fn identify(&self, traits: HashMap<String, Value>) {
        let Some(metrics_id) = &self.metrics_id else {
            log_w!(TAG, "Cannot identify without a metrics id");
            return;
        };

        self.transport.identify(IdentifyPayload {
            user_id: Some(metrics_id.clone()),
            anonymous_id: None,
            traits,
        });
    }

    pub fn flush(&self) {
        self.transport.flush();
    }

    pub async fn shutdown(&self) -> Result<(), AnalyticsErr> {
        self.transport.shutdown().await
    }

    pub async fn shutdown_with_timeout(&self, timeout: Duration) -> Result<(), AnalyticsErr> {
        let result = match tokio::time::timeout(timeout, self.transport.shutdown()).await {
            Ok(result) => result,
            Err(_) => Err(AnalyticsErr::ShutdownTimeout(duration_to_ms(timeout))),
        };

        if let Err(e) = &result {
            log_e!(TAG, "Shutdown failed ({}): {}", e.name(), e);
        }

        result
    }

    // Sensitive properties travel in a second event that never carries the
    // metrics id. The primary event is sent without them.
    fn prepare_events(
        &self,
        mut payload: TrackPayload,
        options: &TrackOptions,
    ) -> Vec<TrackPayload> {
        let sensitive_properties = std::mem::take(&mut payload.sensitive_properties);

        let metrics_id = if options.exclude_metrics_id {
            None
        } else {
            options
                .metrics_id
                .clone()
                .or_else(|| self.metrics_id.clone())
        };

        let mut events = Vec::with_capacity(2);
        if !sensitive_properties.is_empty() {
            let mut anonymous = payload.clone();
            anonymous.properties.extend(sensitive_properties);
            stamp_event(&mut anonymous, None);
            events.push(anonymous);
        }

        stamp_event(&mut payload, metrics_id);
        events.insert(0, payload);
        events
    }
}

fn stamp_event(payload: &mut TrackPayload, metrics_id: Option<String>) {
    match metrics_id {
        Some(id) => {
            payload.user_id = Some(id);
            payload.anonymous_id = None;
        }
        None => {
            payload.user_id = None;
            payload.anonymous_id = Some(METRICS_ANONYMOUS_ID.to_string());
        }
    }

    payload
        .environment_type
        .get_or_insert_with(|| BACKGROUND_ENVIRONMENT_TYPE.to_string());
    payload.message_id = Some(Uuid::new_v4().to_string());
    payload
        .timestamp
        .get_or_insert_with(|| Utc::now().timestamp_millis());
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn split_completion_callback(
    count: usize,
    callback: CompletionCallback,
) -> Vec<CompletionCallback> {
    if count <= 1 {
        return vec![callback];
    }

    let remaining = Arc::new(AtomicUsize::new(count));
    let callback = Arc::new(Mutex::new(Some(callback)));

    (0..count)
        .map(|_| {
            let remaining = remaining.clone();
            let callback = callback.clone();
            let on_complete: CompletionCallback = Box::new(move || {
                if remaining.fetch_sub(1, Ordering::SeqCst) != 1 {
                    return;
                }

                let callback = callback.lock().take();
                if let Some(callback) = callback {
                    callback();
                }
            });
            on_complete
        })
        .collect()
}
