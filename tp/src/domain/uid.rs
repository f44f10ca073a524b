//! Process-wide unique task identities
//!
//! A [`Uid`] combines a monotonic process-local counter, the process id,
//! and a wall-clock stamp. The counter alone makes ids unique within one
//! process; pid and timestamp keep them distinguishable across processes
//! and restarts, so an id logged by one run never aliases one from another.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Shared generation counter. Initialized once at process start, never
/// reset; 0 is reserved for [`Uid::INVALID`].
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid {
    counter: u64,
    pid: u32,
    timestamp: i64,
}

impl Uid {
    /// Sentinel returned when generation fails; never produced otherwise
    pub const INVALID: Uid = Uid {
        counter: 0,
        pid: 0,
        timestamp: -1,
    };

    /// Generate a fresh identity
    ///
    /// Safe under concurrent callers: the counter increment is atomic.
    /// Returns [`Uid::INVALID`] only if the system clock reads before the
    /// unix epoch.
    pub fn generate() -> Uid {
        let timestamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() as i64,
            Err(_) => return Uid::INVALID,
        };

        Uid {
            counter: COUNTER.fetch_add(1, Ordering::Relaxed),
            pid: std::process::id(),
            timestamp,
        }
    }

    /// Check that this is not the invalid sentinel
    pub fn is_valid(&self) -> bool {
        *self != Uid::INVALID
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "invalid");
        }

        match chrono::DateTime::from_timestamp(self.timestamp, 0) {
            Some(stamp) => write!(f, "{:08x}-{}-{}", self.counter, self.pid, stamp.format("%Y%m%dT%H%M%SZ")),
            None => write!(f, "{:08x}-{}-{}", self.counter, self.pid, self.timestamp),
        }
    }
}
