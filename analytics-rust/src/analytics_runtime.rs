use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Notify;
use tokio::task::{Id, JoinHandle};

use crate::analytics_global::AnalyticsGlobal;
use crate::{log_d, log_e, log_w, AnalyticsErr};

const TAG: &str = stringify!(AnalyticsRuntime);
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

type TaskKey = (String, Id);
type TaskMap = Arc<Mutex<HashMap<TaskKey, JoinHandle<()>>>>;

/// Runs background work such as the flush timer. Uses the caller's tokio
/// runtime when there is one, otherwise a small runtime shared by every
/// transport in the process.
pub struct AnalyticsRuntime {
    handle: Handle,
    owned_runtime: Mutex<Option<Arc<Runtime>>>,
    tasks: TaskMap,
    shutdown_notify: Arc<Notify>,
    is_shutdown: Arc<AtomicBool>,
}

impl AnalyticsRuntime {
    #[must_use]
    pub fn get_runtime() -> Arc<AnalyticsRuntime> {
        let (owned_runtime, handle) = find_or_create_runtime();

        Arc::new(AnalyticsRuntime {
            handle,
            owned_runtime: Mutex::new(owned_runtime),
            tasks: Arc::new(Mutex::new(HashMap::new())),
            shutdown_notify: Arc::new(Notify::new()),
            is_shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown.load(Ordering::Relaxed)
    }

    /// Wakes every task waiting on the shutdown notify and aborts the rest.
    /// Tasks spawned afterwards never run.
    pub fn shutdown(&self) {
        self.is_shutdown.store(true, Ordering::Relaxed);
        self.shutdown_notify.notify_waiters();

        match self.tasks.try_lock_for(LOCK_TIMEOUT) {
            Some(mut tasks) => tasks.drain().for_each(|(_, task)| task.abort()),
            None => log_e!(TAG, "Failed to lock tasks during shutdown"),
        }
    }

    pub fn spawn<F, Fut>(&self, tag: &str, task: F) -> Id
    where
        F: FnOnce(Arc<Notify>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let tag_owned = tag.to_string();
        let shutdown_notify = self.shutdown_notify.clone();
        let is_shutdown = self.is_shutdown.clone();
        let tasks = self.tasks.clone();

        log_d!(TAG, "Spawning task {}", tag);

        let handle = self.handle.spawn(async move {
            if is_shutdown.load(Ordering::Relaxed) {
                return;
            }

            task(shutdown_notify).await;

            let id = tokio::task::id();
            match tasks.try_lock_for(LOCK_TIMEOUT) {
                Some(mut tasks) => {
                    tasks.remove(&(tag_owned, id));
                }
                None => log_e!(TAG, "Failed to remove finished task {}", tag_owned),
            }
        });

        let id = handle.id();
        // a task that already finished has nothing left to track
        if !handle.is_finished() {
            match self.tasks.try_lock_for(LOCK_TIMEOUT) {
                Some(mut tasks) => {
                    tasks.insert((tag.to_string(), id), handle);
                }
                None => log_e!(TAG, "Failed to track task {}", tag),
            }
        }

        id
    }

    /// Waits for a task started by `spawn`. A task that already finished, or
    /// was aborted by `shutdown`, resolves immediately.
    pub async fn await_join_handle(&self, tag: &str, id: &Id) -> Result<(), AnalyticsErr> {
        let handle = match self.tasks.try_lock_for(LOCK_TIMEOUT) {
            Some(mut tasks) => tasks.remove(&(tag.to_string(), *id)),
            None => {
                return Err(AnalyticsErr::LockFailure(format!(
                    "Failed to lock tasks while awaiting {tag}"
                )));
            }
        };

        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| AnalyticsErr::ThreadFailure(e.to_string())),
            None => Ok(()),
        }
    }
}

fn find_or_create_runtime() -> (Option<Arc<Runtime>>, Handle) {
    if let Ok(handle) = Handle::try_current() {
        log_d!(TAG, "Using the caller's tokio runtime");
        return (None, handle);
    }

    let global = AnalyticsGlobal::get();
    let mut shared = global.tokio_runtime.lock();

    if let Some(rt) = shared.as_ref().and_then(|rt| rt.upgrade()) {
        let handle = rt.handle().clone();
        return (Some(rt), handle);
    }

    let rt = Arc::new(
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("analytics")
            .enable_all()
            .build()
            .expect("Failed to find or create a tokio Runtime"),
    );

    let handle = rt.handle().clone();
    shared.replace(Arc::downgrade(&rt));
    (Some(rt), handle)
}

impl Drop for AnalyticsRuntime {
    fn drop(&mut self) {
        self.shutdown();

        let Some(owned) = self.owned_runtime.lock().take() else {
            return;
        };

        // still shared with another transport, or safe to drop right here
        if Arc::strong_count(&owned) > 1 || Handle::try_current().is_err() {
            return;
        }

        log_w!(TAG, "Dropping the owned runtime from inside a runtime");
        // a runtime cannot be dropped from within an async context
        std::thread::spawn(move || drop(owned));
    }
}
