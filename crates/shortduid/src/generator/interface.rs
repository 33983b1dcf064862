use core::fmt;

use crate::{Duid, Result};

/// A minimal interface for generating [`Duid`]s.
pub trait IdGenerator {
    /// The error type returned by [`IdGenerator::try_next_id`].
    type Err: fmt::Debug;

    /// Generates the next available ID.
    ///
    /// This is the infallible counterpart to [`IdGenerator::try_next_id`].
    fn next_id(&self) -> Duid
    where
        Self::Err: Into<core::convert::Infallible>,
    {
        match self.try_next_id() {
            Ok(id) => id,
            Err(e) => {
                #[allow(unreachable_code)]
                // `into()` satisfies the trait bound at compile time.
                match e.into() {}
            }
        }
    }

    /// Generates the next available ID with fallible error handling.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and
    /// it is poisoned.
    fn try_next_id(&self) -> Result<Duid, Self::Err>;

    /// Generates a batch of IDs, following the [`crate::batch_len`] policy.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and
    /// it is poisoned.
    fn try_next_batch(&self, count: usize) -> Result<Vec<Duid>, Self::Err>;
}
