//! Wall-clock source for cache timestamps.
//!
//! Cache validity is computed from epoch milliseconds. Production code uses
//! the system clock; tests drive a [`ManualClock`] so TTL expiry can be
//! exercised without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Shared time source.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// `Utc::now()`.
    #[default]
    System,
    /// Externally controlled time.
    Manual(ManualClock),
}

impl Clock {
    /// Current time in epoch milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        match self {
            Self::System => Utc::now().timestamp_millis(),
            Self::Manual(clock) => clock.now_ms(),
        }
    }

    /// Current time as a UTC datetime.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Manual(clock) => Utc
                .timestamp_millis_opt(clock.now_ms())
                .single()
                .unwrap_or_default(),
        }
    }
}

/// Manually advanced clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    #[must_use]
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Create a clock frozen at the current system time.
    #[must_use]
    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    /// Current frozen instant.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    /// Jump to an absolute instant.
    pub fn set(&self, ms: i64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    /// Move time forward.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    /// Wrap into a [`Clock`] handle.
    #[must_use]
    pub fn clock(&self) -> Clock {
        Clock::Manual(self.clone())
    }
}
