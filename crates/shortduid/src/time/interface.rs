/// Standard Unix epoch: Thursday, January 1, 1970 00:00:00 UTC.
///
/// This is also the fallback a generator uses when it is handed an epoch
/// start that lies in the future.
pub const UNIX_EPOCH_MILLIS: u64 = 0;

/// Custom epoch: Monday, June 1, 2015 00:00:00 UTC
pub const EPOCH_2015: u64 = 1_433_116_800_000;

/// A trait for time sources that return a wall-clock aligned timestamp.
///
/// This abstraction allows you to plug in a monotonic timer, the raw system
/// clock, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. Generators subtract
/// their own epoch start and apply any drift offset on top of it.
///
/// # Example
///
/// ```
/// use shortduid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
