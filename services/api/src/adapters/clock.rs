//! services/api/src/adapters/clock.rs

use chrono::{DateTime, Utc};
use recall_core::ports::Clock;

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
