use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock, Weak};
use tokio::runtime::Runtime;

static GLOBAL: OnceLock<ArcSwap<AnalyticsGlobal>> = OnceLock::new();

/// Process-wide state shared by every transport. A forked child sees a new
/// pid and starts from empty state instead of the parent's runtime.
pub struct AnalyticsGlobal {
    pub tokio_runtime: Mutex<Option<Weak<Runtime>>>,
    pub pid: u32,
}

impl AnalyticsGlobal {
    pub fn get() -> Arc<AnalyticsGlobal> {
        let global =
            GLOBAL.get_or_init(|| ArcSwap::from_pointee(AnalyticsGlobal::for_current_process()));

        if global.load().pid != std::process::id() {
            global.store(Arc::new(AnalyticsGlobal::for_current_process()));
        }

        global.load_full()
    }

    fn for_current_process() -> Self {
        Self {
            tokio_runtime: Mutex::new(None),
            pid: std::process::id(),
        }
    }
}
