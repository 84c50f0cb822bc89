pub mod queue;
pub mod queued_event;

pub use queue::{BatchQueue, FlushAt};
pub use queued_event::{CompletionCallback, QueuedEvent};
