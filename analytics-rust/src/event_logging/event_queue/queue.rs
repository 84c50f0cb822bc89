use super::queued_event::QueuedEvent;
use crate::event_logging::flush_type::FlushType;
use crate::{lock_or_return, log_d, log_e, log_w};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

const TAG: &str = stringify!(BatchQueue);
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of queued events that forces a flush from inside `enqueue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushAt {
    Count(u32),
    /// Only the interval timer or a manual flush drains the queue.
    Unbounded,
}

impl FlushAt {
    /// A threshold of zero would flush before an event is ever considered
    /// queued, so it is raised to one.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            FlushAt::Count(0) => {
                log_w!(TAG, "flush_at must be at least 1. Using 1 instead of 0");
                FlushAt::Count(1)
            }
            other => other,
        }
    }

    pub fn is_reached_by(&self, queue_len: usize) -> bool {
        match self {
            FlushAt::Count(count) => queue_len >= *count as usize,
            FlushAt::Unbounded => false,
        }
    }
}

impl From<u32> for FlushAt {
    fn from(count: u32) -> Self {
        FlushAt::Count(count)
    }
}

pub struct BatchQueue {
    flush_at: FlushAt,
    pending_events: Mutex<Vec<QueuedEvent>>,
}

impl BatchQueue {
    pub fn new(flush_at: FlushAt) -> Self {
        Self {
            flush_at: flush_at.normalized(),
            pending_events: Mutex::new(Vec::new()),
        }
    }

    pub fn flush_at(&self) -> FlushAt {
        self.flush_at
    }

    pub fn len(&self) -> usize {
        lock_or_return!(TAG, self.pending_events, 0).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends to the tail of the queue. Reaching `flush_at` drains the queue,
    /// including this event, before returning. If the queue cannot be locked
    /// the event is acknowledged on the spot so its callback still fires.
    pub fn enqueue(&self, event: QueuedEvent) {
        let Some(mut pending_events) = self.pending_events.try_lock_for(LOCK_TIMEOUT) else {
            log_e!(
                TAG,
                "Failed to lock queue. Acknowledging '{}' without batching",
                event.payload.event
            );
            acknowledge(event);
            return;
        };

        pending_events.push(event);
        let has_reached_limit = self.flush_at.is_reached_by(pending_events.len());
        drop(pending_events);

        if has_reached_limit {
            self.flush(FlushType::Limit);
        }
    }

    /// Takes everything currently queued and invokes the callbacks in
    /// insertion order. The live queue is emptied before the first callback
    /// runs, so events queued by a callback wait for the next flush.
    ///
    /// Returns the number of events drained.
    pub fn flush(&self, flush_type: FlushType) -> usize {
        let events = self.take_all_pending_events();
        if events.is_empty() {
            return 0;
        }

        let count = events.len();
        log_d!(TAG, "Flushing {} events ({})", count, flush_type);

        events.into_iter().for_each(acknowledge);

        count
    }

    fn take_all_pending_events(&self) -> Vec<QueuedEvent> {
        let mut pending_events = lock_or_return!(TAG, self.pending_events, Vec::new());
        std::mem::take(&mut *pending_events)
    }
}

// A panicking callback is logged and never reaches the caller.
fn acknowledge(event: QueuedEvent) {
    let QueuedEvent {
        payload,
        on_complete,
    } = event;

    if let Err(err) = panic::catch_unwind(AssertUnwindSafe(on_complete)) {
        log_e!(
            TAG,
            "Completion callback for event '{}' panicked: {}",
            payload.event,
            panic_message(err.as_ref())
        );
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(msg) = err.downcast_ref::<&str>() {
        return (*msg).to_string();
    }

    if let Some(msg) = err.downcast_ref::<String>() {
        return msg.clone();
    }

    "unknown panic".to_string()
}
