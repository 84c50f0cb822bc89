use super::analytics_event::PageObject;
use super::event_queue::FlushAt;

const DEFAULT_FLUSH_INTERVAL_MS: u64 = 5000;
const MIN_FLUSH_INTERVAL_MS: u64 = 1;
const PRODUCTION_ENVIRONMENT: &str = "production";

pub const METRICS_ANONYMOUS_ID: &str = "0x0000000000000000";

pub const ENVIRONMENT_ENV_VAR: &str = "ANALYTICS_ENVIRONMENT";
pub const FLUSH_INTERVAL_OVERRIDE_ENV_VAR: &str = "ANALYTICS_TEST_OVERRIDE_FLUSH_INTERVAL_MS";

pub struct AnalyticsConstants;

impl AnalyticsConstants {
    pub fn flush_interval_ms() -> u64 {
        let env_var = std::env::var(FLUSH_INTERVAL_OVERRIDE_ENV_VAR)
            .ok()
            .unwrap_or_default();

        if env_var.is_empty() {
            return DEFAULT_FLUSH_INTERVAL_MS;
        }

        env_var.parse::<u64>().unwrap_or(DEFAULT_FLUSH_INTERVAL_MS)
    }

    pub fn min_flush_interval_ms() -> u64 {
        MIN_FLUSH_INTERVAL_MS
    }

    /// The environment named by `ANALYTICS_ENVIRONMENT`, if set.
    pub fn environment() -> Option<String> {
        std::env::var(ENVIRONMENT_ENV_VAR)
            .ok()
            .filter(|env| !env.is_empty())
    }

    /// Production batches until the interval fires. Anywhere else every event
    /// is flushed as soon as it is tracked so it can be observed in real time.
    pub fn flush_at_for_environment(environment: Option<&str>) -> FlushAt {
        match environment {
            Some(env) if env.eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT) => FlushAt::Unbounded,
            _ => FlushAt::Count(1),
        }
    }

    pub fn background_page_object() -> PageObject {
        PageObject {
            path: Some("/background-process".to_string()),
            title: Some("Background Process".to_string()),
            url: Some("/background-process".to_string()),
        }
    }
}
