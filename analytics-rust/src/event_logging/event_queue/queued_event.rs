use crate::event_logging::analytics_event::TrackPayload;

/// Invoked exactly once when the event it was queued with is considered sent.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

pub struct QueuedEvent {
    pub payload: TrackPayload,
    pub on_complete: CompletionCallback,
}

impl QueuedEvent {
    pub fn new(payload: TrackPayload, on_complete: CompletionCallback) -> Self {
        Self {
            payload,
            on_complete,
        }
    }

    pub fn without_callback(payload: TrackPayload) -> Self {
        Self::new(payload, Box::new(|| {}))
    }
}
