use crate::event_logging::analytics_constants::AnalyticsConstants;
use crate::event_logging::event_queue::FlushAt;
use crate::output_logger::LogLevel;
use crate::transport::AnalyticsTransport;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AnalyticsOptions {
    pub environment: Option<String>, // Falls back to ANALYTICS_ENVIRONMENT

    pub flush_at: Option<FlushAt>,
    pub flush_interval_ms: Option<u64>,

    pub output_log_level: Option<LogLevel>,
    pub transport: Option<Arc<dyn AnalyticsTransport>>, // Defaults to BatchingMockTransport
}

impl AnalyticsOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> AnalyticsOptionsBuilder {
        AnalyticsOptionsBuilder::default()
    }

    pub fn resolved_environment(&self) -> Option<String> {
        self.environment
            .clone()
            .or_else(AnalyticsConstants::environment)
    }

    pub fn resolved_flush_at(&self) -> FlushAt {
        let flush_at = match self.flush_at {
            Some(flush_at) => flush_at,
            None => {
                let environment = self.resolved_environment();
                AnalyticsConstants::flush_at_for_environment(environment.as_deref())
            }
        };

        flush_at.normalized()
    }

    pub fn resolved_flush_interval_ms(&self) -> u64 {
        self.flush_interval_ms
            .unwrap_or_else(AnalyticsConstants::flush_interval_ms)
    }
}

impl fmt::Debug for AnalyticsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsOptions")
            .field("environment", &self.environment)
            .field("flush_at", &self.flush_at)
            .field("flush_interval_ms", &self.flush_interval_ms)
            .field("output_log_level", &self.output_log_level)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

#[derive(Default)]
pub struct AnalyticsOptionsBuilder {
    inner: AnalyticsOptions,
}

impl AnalyticsOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn environment(mut self, environment: Option<String>) -> Self {
        self.inner.environment = environment;
        self
    }

    // Batching

    #[must_use]
    pub fn flush_at(mut self, flush_at: Option<FlushAt>) -> Self {
        self.inner.flush_at = flush_at;
        self
    }

    #[must_use]
    pub fn flush_interval_ms(mut self, flush_interval_ms: Option<u64>) -> Self {
        self.inner.flush_interval_ms = flush_interval_ms;
        self
    }

    // Other

    #[must_use]
    pub fn output_log_level(mut self, output_log_level: Option<u32>) -> Self {
        if let Some(level) = output_log_level {
            self.inner.output_log_level = Some(LogLevel::from(level));
        }
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Option<Arc<dyn AnalyticsTransport>>) -> Self {
        self.inner.transport = transport;
        self
    }

    #[must_use]
    pub fn build(self) -> AnalyticsOptions {
        self.inner
    }
}
