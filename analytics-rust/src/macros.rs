#[macro_export]
macro_rules! lock_or_return {
    ($tag: expr, $lock:expr, $code: expr) => {
        match $lock.try_lock_for(std::time::Duration::from_secs(5)) {
            Some(data) => data,
            None => {
                $crate::log_e!($tag, "Failed to acquire lock");
                return $code;
            }
        }
    };
}
