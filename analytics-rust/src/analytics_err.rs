use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum AnalyticsErr {
    // System / Concurrency
    LockFailure(String),
    ThreadFailure(String),

    // Delivery
    AcknowledgementDropped(String),

    // Data Format / Serialization
    SerializationError(String),

    // Shutdown
    ShutdownTimeout(u64),
}

impl Display for AnalyticsErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsErr::LockFailure(msg) => write!(f, "Failed to acquire lock: {msg}"),
            AnalyticsErr::ThreadFailure(msg) => write!(f, "Thread failure: {msg}"),

            AnalyticsErr::AcknowledgementDropped(event) => {
                write!(f, "Event '{event}' was dropped before it was acknowledged")
            }

            AnalyticsErr::SerializationError(msg) => write!(f, "Serialization error: {msg}"),

            AnalyticsErr::ShutdownTimeout(ms) => write!(f, "Shutdown timed out after {ms}ms"),
        }
    }
}

impl std::error::Error for AnalyticsErr {}

impl AnalyticsErr {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsErr::LockFailure(_) => "LockFailure",
            AnalyticsErr::ThreadFailure(_) => "ThreadFailure",

            AnalyticsErr::AcknowledgementDropped(_) => "AcknowledgementDropped",

            AnalyticsErr::SerializationError(_) => "SerializationError",

            AnalyticsErr::ShutdownTimeout(_) => "ShutdownTimeout",
        }
    }
}
