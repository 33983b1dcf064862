use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The raw system wall clock.
///
/// Unlike [`crate::MonotonicClock`], this follows every adjustment made to
/// the system clock, including steps backward. Generators stay unique under
/// such steps, but their logical clock runs ahead until wall time catches
/// up again.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
