use analytics_rust::CompletionCallback;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub async fn assert_eventually<F>(assertion: F, timeout: Duration)
where
    F: Fn() -> bool,
{
    let steps = timeout.as_millis() / 10;
    for _ in 0..steps {
        if assertion() {
            return;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("assertion timed out");
}

/// Collects the labels of completion callbacks in the order they fire.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    fired: Arc<Mutex<Vec<String>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self, label: &str) -> CompletionCallback {
        let fired = self.fired.clone();
        let label = label.to_string();
        Box::new(move || fired.lock().push(label))
    }

    pub fn fired(&self) -> Vec<String> {
        self.fired.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.fired.lock().len()
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.fired.lock().iter().filter(|l| *l == label).count()
    }
}
