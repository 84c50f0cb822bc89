use super::analytics_constants::AnalyticsConstants;
use super::event_queue::BatchQueue;
use super::flush_type::FlushType;
use crate::{log_d, log_w, AnalyticsErr, AnalyticsRuntime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::Notify;
use tokio::time::{sleep, Duration};

const TAG: &str = stringify!(FlushTimer);

/// Flushes a `BatchQueue` every `interval_ms`, regardless of how many events
/// it holds. Size triggered flushes neither pause nor reset it.
///
/// The loop ends when `stop` is called, the timer is dropped, the runtime
/// shuts down, or the queue it drains is dropped.
pub struct FlushTimer {
    interval_ms: u64,
    task_id: tokio::task::Id,
    is_running: Arc<AtomicBool>,
    stop_notify: Arc<Notify>,
    runtime: Arc<AnalyticsRuntime>,
}

impl FlushTimer {
    pub fn start(
        queue: &Arc<BatchQueue>,
        interval_ms: u64,
        runtime: &Arc<AnalyticsRuntime>,
    ) -> Self {
        let min_interval_ms = AnalyticsConstants::min_flush_interval_ms();
        if interval_ms < min_interval_ms {
            log_w!(
                TAG,
                "Flush interval of {}ms is too small. Using {}ms",
                interval_ms,
                min_interval_ms
            );
        }
        let interval_ms = interval_ms.max(min_interval_ms);
        let weak_queue = Arc::downgrade(queue);
        let is_running = Arc::new(AtomicBool::new(true));
        let stop_notify = Arc::new(Notify::new());

        log_d!(TAG, "Starting flush timer every {}ms", interval_ms);

        let task_is_running = is_running.clone();
        let task_stop_notify = stop_notify.clone();
        let task_id = runtime.spawn(TAG, move |rt_shutdown_notify| async move {
            loop {
                tokio::select! {
                    () = sleep(Duration::from_millis(interval_ms)) => {
                        if !Self::flush_if_alive(&weak_queue) {
                            log_d!(TAG, "Queue dropped. Stopping flush timer");
                            break;
                        }
                    }
                    () = rt_shutdown_notify.notified() => {
                        log_d!(TAG, "Runtime shutdown. Stopping flush timer");
                        break;
                    }
                    () = task_stop_notify.notified() => {
                        log_d!(TAG, "Flush timer stopped");
                        break;
                    }
                }
            }

            task_is_running.store(false, Ordering::SeqCst);
        });

        Self {
            interval_ms,
            task_id,
            is_running,
            stop_notify,
            runtime: runtime.clone(),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst) && !self.runtime.is_shutdown()
    }

    /// Cancels the timer. Safe to call more than once.
    pub fn stop(&self) {
        // notify_one keeps a permit, so a loop that has not reached its
        // select! yet still observes the stop
        self.stop_notify.notify_one();
    }

    pub async fn stop_and_wait(&self) -> Result<(), AnalyticsErr> {
        self.stop();
        self.runtime.await_join_handle(TAG, &self.task_id).await
    }

    fn flush_if_alive(weak_queue: &Weak<BatchQueue>) -> bool {
        match weak_queue.upgrade() {
            Some(queue) => {
                queue.flush(FlushType::ScheduledInterval);
                true
            }
            None => false,
        }
    }
}

impl Drop for FlushTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
