use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{IdGenerator, batch_len},
    id::Duid,
    time::{MonotonicClock, TimeSource, UNIX_EPOCH_MILLIS},
};

/// A non-concurrent [`Duid`] generator owning one shard's clock and
/// sequence state.
///
/// This generator is lightweight and fast, but **not thread-safe**. Wrap it
/// in a [`LockDuidGenerator`] (or confine it to one worker) when several
/// threads need IDs from the same shard.
///
/// ## Clock handling
///
/// The generator never waits for the wall clock. When the clock stalls, runs
/// backward, or a single millisecond runs out of sequence numbers, the
/// logical timestamp is advanced by one millisecond and the sequence resets.
/// The logical clock may therefore run ahead of wall time; it falls back in
/// line once wall time overtakes it.
///
/// ## See Also
/// - [`LockDuidGenerator`]
/// - [`crate::ShortDuid`]
///
/// [`LockDuidGenerator`]: crate::generator::LockDuidGenerator
pub struct DuidGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    state: Cell<Option<Duid>>,
    drift: Cell<i64>,
    shard_id: u64,
    epoch_start: u64,
    time: T,
}

impl<T> DuidGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`DuidGenerator`] for `shard_id`, counting time from
    /// `epoch_start` (milliseconds since the Unix epoch).
    ///
    /// # Parameters
    ///
    /// - `shard_id`: Identifies this generator among all generators sharing
    ///   an ID space. Only the low 10 bits are kept, so `1024` folds to `0`.
    /// - `epoch_start`: The zero-point of the embedded timestamps. A value
    ///   later than the current time read from `time` is replaced by
    ///   [`UNIX_EPOCH_MILLIS`].
    /// - `time`: A [`TimeSource`] implementation (e.g., [`MonotonicClock`]).
    ///
    /// # Example
    /// ```
    /// use shortduid::{DuidGenerator, MonotonicClock, EPOCH_2015};
    ///
    /// let generator = DuidGenerator::new(1025, EPOCH_2015, MonotonicClock::new());
    /// assert_eq!(generator.shard_id(), 1);
    ///
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert!(a < b);
    /// ```
    pub fn new(shard_id: u64, epoch_start: u64, time: T) -> Self {
        let masked = shard_id & Duid::SHARD_ID_MASK;
        if masked != shard_id {
            #[cfg(feature = "tracing")]
            tracing::warn!(shard_id, masked, "shard id wider than 10 bits, folding");
        }

        let now = time.current_millis();
        let epoch_start = if epoch_start > now {
            #[cfg(feature = "tracing")]
            tracing::warn!(epoch_start, now, "epoch start lies in the future, using unix epoch");
            UNIX_EPOCH_MILLIS
        } else {
            epoch_start
        };

        Self {
            state: Cell::new(None),
            drift: Cell::new(0),
            shard_id: masked,
            epoch_start,
            time,
        }
    }

    /// Creates a generator whose last issued ID is `(timestamp, shard_id,
    /// sequence)`.
    ///
    /// The next ID will be strictly greater than that one. The epoch start is
    /// taken as-is, without the future-epoch check of [`Self::new`].
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn from_components(
        timestamp: u64,
        shard_id: u64,
        sequence: u64,
        epoch_start: u64,
        time: T,
    ) -> Self {
        let id = Duid::from(timestamp, shard_id, sequence);
        Self {
            state: Cell::new(Some(id)),
            drift: Cell::new(0),
            shard_id: id.shard_id(),
            epoch_start,
            time,
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

    /// Returns the current drift offset in milliseconds.
    pub fn drift(&self) -> i64 {
        self.drift.get()
    }

    /// Sets the drift offset added to every clock reading and returns it.
    ///
    /// Negative values simulate a clock that was stepped backward. This hook
    /// exists to exercise clock-skew handling; production code leaves it at
    /// zero.
    pub fn drift_time(&self, offset_ms: i64) -> i64 {
        self.drift.set(offset_ms);
        offset_ms
    }

    /// Returns the wall-clock time in milliseconds since the Unix epoch,
    /// biased by the drift offset.
    pub fn current_millis(&self) -> i64 {
        let wall = i64::try_from(self.time.current_millis()).unwrap_or(i64::MAX);
        wall.saturating_add(self.drift.get())
    }

    /// Returns the last ID handed out, if any.
    pub fn last_id(&self) -> Option<Duid> {
        self.state.get()
    }

    /// Milliseconds since the epoch start, clamped at zero and masked to the
    /// timestamp width.
    fn relative_millis(&self) -> u64 {
        let epoch = i64::try_from(self.epoch_start).unwrap_or(i64::MAX);
        let relative = self.current_millis().saturating_sub(epoch).max(0);
        relative.unsigned_abs() & Duid::TIMESTAMP_MASK
    }

    /// Generates a new ID.
    ///
    /// Every ID is strictly greater than the one before it, whatever the
    /// clock does in between, until the 41-bit timestamp is used up.
    ///
    /// # ⚠️ Note
    /// The timestamp is masked to 41 bits, about 69.7 years past the epoch
    /// start (2039 for an epoch start of 0). Advancing past
    /// [`Duid::max_timestamp`], by the clock, by drift or by sequence
    /// rollover, wraps the timestamp to 0 and the next ID sorts below the
    /// last one.
    ///
    /// # Example
    /// ```
    /// use shortduid::{DuidGenerator, TimeSource};
    ///
    /// struct FixedTime;
    /// impl TimeSource for FixedTime {
    ///     fn current_millis(&self) -> u64 {
    ///         42
    ///     }
    /// }
    ///
    /// let generator = DuidGenerator::new(3, 0, FixedTime);
    /// let id = generator.next_id();
    /// assert_eq!((id.timestamp(), id.shard_id(), id.sequence()), (42, 3, 0));
    /// let id = generator.next_id();
    /// assert_eq!((id.timestamp(), id.shard_id(), id.sequence()), (42, 3, 1));
    /// ```
    pub fn next_id(&self) -> Duid {
        let now = self.relative_millis();
        let next = match self.state.get() {
            None => Duid::from(now, self.shard_id, 0),
            Some(last) => match now.cmp(&last.timestamp()) {
                Ordering::Greater => last.rollover_to_timestamp(now),
                Ordering::Equal => Self::advance(last),
                Ordering::Less => Self::cold_clock_behind(now, last),
            },
        };
        self.state.set(Some(next));
        next
    }

    /// Generates `count` IDs, in increasing order.
    ///
    /// Follows the [`batch_len`] policy: `0` yields nothing, and a request
    /// above [`crate::MAX_BATCH_SIZE`] yields a single ID.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_batch(&self, count: usize) -> Vec<Duid> {
        let len = batch_len(count);
        if len != count {
            #[cfg(feature = "tracing")]
            tracing::debug!(count, "batch request above maximum, returning a single id");
        }
        (0..len).map(|_| self.next_id()).collect()
    }

    #[inline]
    fn advance(last: Duid) -> Duid {
        if last.has_sequence_room() {
            last.increment_sequence()
        } else {
            Self::cold_sequence_exhausted(last)
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(last: Duid) -> Duid {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            timestamp = last.timestamp(),
            "sequence exhausted, advancing logical clock"
        );
        last.rollover_to_timestamp(last.timestamp() + 1)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: Duid) -> Duid {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            now,
            timestamp = last.timestamp(),
            "clock behind logical timestamp"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = now;
        Self::advance(last)
    }
}

impl<T> IdGenerator for DuidGenerator<T>
where
    T: TimeSource,
{
    type Err = core::convert::Infallible;

    fn try_next_id(&self) -> Result<Duid, Self::Err> {
        Ok(self.next_id())
    }

    fn try_next_batch(&self, count: usize) -> Result<Vec<Duid>, Self::Err> {
        Ok(self.next_batch(count))
    }
}
