use std::time::Instant;

use crate::{SystemClock, TimeSource};

/// A monotonic time source aligned to the wall clock once, at construction.
///
/// The clock captures `Instant::now()` together with the current system
/// time. Every later reading is that system time plus the monotonic time
/// elapsed since, so the clock never goes backward even if the system clock
/// is adjusted externally (NTP steps, manual changes).
///
/// The price is that the clock does not follow deliberate corrections of the
/// system time either; long-lived processes drift with their monotonic
/// timer.
///
/// # Example
///
/// ```
/// use shortduid::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(2));
/// assert!(clock.current_millis() >= a + 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    start_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a clock anchored to the current system time.
    pub fn new() -> Self {
        Self::anchored_at(SystemClock.current_millis())
    }

    /// Constructs a clock that reports `start_millis` right now and advances
    /// monotonically from there.
    pub fn anchored_at(start_millis: u64) -> Self {
        Self {
            start: Instant::now(),
            start_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.start_millis.saturating_add(elapsed)
    }
}
