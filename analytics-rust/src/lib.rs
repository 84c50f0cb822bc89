pub use analytics::Analytics;
pub use analytics_err::AnalyticsErr;
pub use analytics_options::{AnalyticsOptions, AnalyticsOptionsBuilder};
pub use analytics_runtime::AnalyticsRuntime;
pub use event_logging::analytics_constants::{AnalyticsConstants, METRICS_ANONYMOUS_ID};
pub use event_logging::analytics_event::{
    AppInfo, EventContext, IdentifyPayload, PageObject, PagePayload, Referrer, TrackPayload,
};
pub use event_logging::event_queue::{BatchQueue, CompletionCallback, FlushAt, QueuedEvent};
pub use event_logging::flush_timer::FlushTimer;
pub use event_logging::flush_type::FlushType;
pub use event_logging::track_options::TrackOptions;
pub use transport::*;

pub mod analytics_global;
pub mod analytics_options;
pub mod analytics_runtime;
pub mod event_logging;
pub mod output_logger;
pub mod transport;

mod analytics;
mod analytics_err;
mod macros;
