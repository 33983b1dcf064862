use std::sync::Arc;

#[cfg(feature = "parking-lot")]
use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
use std::sync::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result,
    generator::{DuidGenerator, IdGenerator},
    id::Duid,
    time::{MonotonicClock, TimeSource},
};

/// A lock-based [`Duid`] generator suitable for multi-threaded environments.
///
/// This generator wraps a [`DuidGenerator`] in an [`Arc<Mutex<_>>`], so the
/// timestamp and sequence advance together as one transition no matter how
/// many threads share it. Cloning is cheap and every clone hands out IDs from
/// the same sequence.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Same clock handling as [`DuidGenerator`]
///
/// ## Recommended When
/// - Several threads must mint IDs for the same shard
///
/// ## See Also
/// - [`DuidGenerator`]
pub struct LockDuidGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    state: Arc<Mutex<DuidGenerator<T>>>,
    shard_id: u64,
    epoch_start: u64,
}

impl<T> Clone for LockDuidGenerator<T>
where
    T: TimeSource,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            shard_id: self.shard_id,
            epoch_start: self.epoch_start,
        }
    }
}

impl<T> LockDuidGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockDuidGenerator`]; see [`DuidGenerator::new`] for
    /// how `shard_id` and `epoch_start` are normalised.
    ///
    /// # Example
    /// ```
    /// use shortduid::{LockDuidGenerator, MonotonicClock};
    ///
    /// let generator = LockDuidGenerator::new(7, 0, MonotonicClock::new());
    /// let other = generator.clone();
    ///
    /// let handle = std::thread::spawn(move || other.try_next_id());
    /// let a = generator.try_next_id().unwrap();
    /// let b = handle.join().unwrap().unwrap();
    /// assert_ne!(a, b);
    /// ```
    pub fn new(shard_id: u64, epoch_start: u64, time: T) -> Self {
        Self::from_generator(DuidGenerator::new(shard_id, epoch_start, time))
    }

    /// Moves an existing generator behind the lock.
    pub fn from_generator(generator: DuidGenerator<T>) -> Self {
        Self {
            shard_id: generator.shard_id(),
            epoch_start: generator.epoch_start(),
            state: Arc::new(Mutex::new(generator)),
        }
    }

    /// Returns the (10-bit) shard ID embedded in every generated ID.
    pub const fn shard_id(&self) -> u64 {
        self.shard_id
    }

    /// Returns the epoch start in milliseconds since the Unix epoch.
    pub const fn epoch_start(&self) -> u64 {
        self.epoch_start
    }

    /// Generates a new ID while holding the lock.
    ///
    /// # Errors
    /// - Returns an error if the underlying lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<Duid, Error> {
        let generator = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        Ok(generator.next_id())
    }

    /// Generates a whole batch under a single lock acquisition, so the batch
    /// is contiguous in this shard's sequence.
    ///
    /// # Errors
    /// - Returns an error if the underlying lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_batch(&self, count: usize) -> Result<Vec<Duid>, Error> {
        let generator = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        Ok(generator.next_batch(count))
    }

    /// Sets the drift offset of the shared generator and returns it.
    ///
    /// # Errors
    /// - Returns an error if the underlying lock has been poisoned.
    pub fn try_drift_time(&self, offset_ms: i64) -> Result<i64, Error> {
        let generator = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        Ok(generator.drift_time(offset_ms))
    }
}

impl<T> IdGenerator for LockDuidGenerator<T>
where
    T: TimeSource,
{
    type Err = Error;

    fn try_next_id(&self) -> Result<Duid, Self::Err> {
        self.try_next_id()
    }

    fn try_next_batch(&self, count: usize) -> Result<Vec<Duid>, Self::Err> {
        self.try_next_batch(count)
    }
}
