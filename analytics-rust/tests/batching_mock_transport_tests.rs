mod utils;

use analytics_rust::{
    AnalyticsTransport, BatchingMockTransport, FlushAt, IdentifyPayload, PagePayload,
    TrackPayload,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use utils::helpers::CallbackRecorder;

const LONG_INTERVAL_MS: u64 = 60_000;

fn setup(flush_at: FlushAt) -> (Arc<BatchingMockTransport>, CallbackRecorder) {
    let transport = Arc::new(BatchingMockTransport::new(flush_at, LONG_INTERVAL_MS));
    (transport, CallbackRecorder::new())
}

fn event(name: &str) -> TrackPayload {
    TrackPayload::new(name, "Test").with_property("source", "batching_mock_transport_tests")
}

#[tokio::test]
async fn test_threshold_flush_fires_every_callback_once() {
    let flush_at = 5;
    let (transport, recorder) = setup(FlushAt::Count(flush_at));

    for i in 0..flush_at - 1 {
        let label = format!("cb{i}");
        transport.track(event(&label), Some(recorder.callback(&label)));
    }

    assert_eq!(transport.queue_len(), (flush_at - 1) as usize);
    assert_eq!(recorder.count(), 0);

    transport.track(event("cb4"), Some(recorder.callback("cb4")));

    assert_eq!(transport.queue_len(), 0);
    assert_eq!(recorder.count(), flush_at as usize);
    for i in 0..flush_at {
        assert_eq!(recorder.count_of(&format!("cb{i}")), 1);
    }
}

#[tokio::test]
async fn test_flush_at_one_acknowledges_before_track_returns() {
    let (transport, recorder) = setup(FlushAt::Count(1));

    for i in 0..10 {
        let label = format!("cb{i}");
        transport.track(event(&label), Some(recorder.callback(&label)));

        assert_eq!(recorder.count(), i + 1);
        assert_eq!(recorder.fired().last(), Some(&label));
        assert_eq!(transport.queue_len(), 0);
    }
}

#[tokio::test]
async fn test_flush_on_empty_queue_is_noop() {
    let (transport, recorder) = setup(FlushAt::Count(3));

    transport.flush();
    transport.flush();

    assert_eq!(transport.queue_len(), 0);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_event_tracked_during_flush_waits_for_next_pass() {
    let (transport, recorder) = setup(FlushAt::Count(10));

    let transport_clone = transport.clone();
    let recorder_clone = recorder.clone();
    let callback_a = recorder.callback("a");
    transport.track(
        event("a"),
        Some(Box::new(move || {
            callback_a();
            transport_clone.track(event("c"), Some(recorder_clone.callback("c")));
        })),
    );
    transport.track(event("b"), Some(recorder.callback("b")));

    transport.flush();

    assert_eq!(recorder.fired(), vec!["a", "b"]);
    assert_eq!(transport.queue_len(), 1);

    transport.flush();

    assert_eq!(recorder.fired(), vec!["a", "b", "c"]);
    assert_eq!(transport.queue_len(), 0);
}

#[tokio::test]
async fn test_page_and_identify_are_noops() {
    let (transport, recorder) = setup(FlushAt::Count(2));

    transport.track(event("a"), Some(recorder.callback("a")));

    transport.page(PagePayload::default());
    transport.page(PagePayload {
        name: Some("Home".to_string()),
        ..PagePayload::default()
    });
    transport.identify(IdentifyPayload::default());
    transport.identify(IdentifyPayload {
        user_id: Some("0xabc".to_string()),
        anonymous_id: None,
        traits: HashMap::from([("theme".to_string(), json!("dark"))]),
    });

    assert_eq!(transport.queue_len(), 1);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_three_event_batch_flushes_in_order() {
    let transport = BatchingMockTransport::new(FlushAt::Count(3), 5000);
    let recorder = CallbackRecorder::new();

    transport.track(event("a"), Some(recorder.callback("cb1")));
    transport.track(event("b"), Some(recorder.callback("cb2")));

    assert_eq!(transport.queue_len(), 2);
    assert_eq!(recorder.count(), 0);

    transport.track(event("c"), Some(recorder.callback("cb3")));

    assert_eq!(recorder.fired(), vec!["cb1", "cb2", "cb3"]);
    assert_eq!(transport.queue_len(), 0);
}

#[tokio::test]
async fn test_track_without_callback_still_counts_toward_threshold() {
    let (transport, recorder) = setup(FlushAt::Count(3));

    transport.track(event("a"), None);
    transport.track(event("b"), None);
    transport.track(event("c"), Some(recorder.callback("c")));

    assert_eq!(recorder.fired(), vec!["c"]);
    assert_eq!(transport.queue_len(), 0);
}

#[tokio::test]
async fn test_panicking_callback_does_not_block_siblings() {
    let (transport, recorder) = setup(FlushAt::Count(3));

    transport.track(event("a"), Some(recorder.callback("a")));
    transport.track(event("b"), Some(Box::new(|| panic!("boom"))));
    transport.track(event("c"), Some(recorder.callback("c")));

    assert_eq!(recorder.fired(), vec!["a", "c"]);
    assert_eq!(transport.queue_len(), 0);
}

#[tokio::test]
async fn test_unbounded_only_flushes_manually() {
    let (transport, recorder) = setup(FlushAt::Unbounded);

    for i in 0..500 {
        transport.track(event(&format!("e{i}")), Some(recorder.callback("e")));
    }

    assert_eq!(transport.queue_len(), 500);
    assert_eq!(recorder.count(), 0);

    transport.flush();

    assert_eq!(recorder.count(), 500);
    assert_eq!(transport.queue_len(), 0);
}

#[tokio::test]
async fn test_shutdown_drains_queue_and_stops_timer() {
    let (transport, recorder) = setup(FlushAt::Unbounded);

    transport.track(event("a"), Some(recorder.callback("a")));
    transport.shutdown().await.unwrap();

    assert_eq!(recorder.fired(), vec!["a"]);
    assert!(!transport.flush_timer().is_running());
}

#[tokio::test]
async fn test_dispose_keeps_queued_events() {
    let transport = BatchingMockTransport::new(FlushAt::Unbounded, 10);
    let was_called = Arc::new(AtomicBool::new(false));

    transport.dispose();

    let was_called_clone = was_called.clone();
    transport.track(
        event("a"),
        Some(Box::new(move || {
            was_called_clone.store(true, Ordering::SeqCst);
        })),
    );

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(!was_called.load(Ordering::SeqCst));
    assert_eq!(transport.queue_len(), 1);

    transport.flush();
    assert!(was_called.load(Ordering::SeqCst));
}
