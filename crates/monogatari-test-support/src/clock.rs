//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeZone, Utc};
use monogatari_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at the given UTC wall time.
    ///
    /// # Panics
    ///
    /// Panics if the arguments do not form a valid date and time.
    #[must_use]
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
                .single()
                .expect("FixedClock::at needs a valid UTC date and time"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
