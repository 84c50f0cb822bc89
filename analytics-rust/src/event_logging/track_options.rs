#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackOptions {
    /// Flush the transport right after tracking. Use when the result must be
    /// known before moving on, e.g. before a UI transition.
    pub flush_immediately: bool,
    /// Send the event under the anonymous id instead of the metrics id.
    pub exclude_metrics_id: bool,
    /// Replaces the client's metrics id for this event only.
    pub metrics_id: Option<String>,
}

impl TrackOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn flush_immediately() -> Self {
        Self {
            flush_immediately: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            exclude_metrics_id: true,
            ..Self::default()
        }
    }
}
