use std::time::{Duration, Instant};

/// Logs how long a scope took when dropped.
pub struct ScopedTimer {
    label: &'static str,
    level: log::Level,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(label: &'static str) -> Self {
        Self::with_level(label, log::Level::Info)
    }

    pub fn with_level(label: &'static str, level: log::Level) -> Self {
        Self {
            label,
            level,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::log!(self.level, "{} took {:?}", self.label, self.start.elapsed());
    }
}
