pub mod analytics_constants;
pub mod analytics_event;
pub mod event_queue;
pub mod flush_timer;
pub mod flush_type;
pub mod track_options;
