use core::num::ParseIntError;

/// A result type defaulting to the crate [`Error`].
///
/// Most `shortduid` APIs are infallible. Only the token generator, the
/// shared (locked) generator, custom hashid alphabets, and decimal parsing
/// can fail.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `shortduid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system's secure random source could not produce bytes.
    ///
    /// Token generation never falls back to a non-cryptographic generator;
    /// the failure is surfaced to the caller instead.
    #[error("secure random source failed: {0}")]
    RandomSource(String),

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A custom hashid alphabet has fewer unique characters than the codec
    /// needs to build separators and guards.
    #[error("hashid alphabet must contain at least {min} unique characters, got {len}")]
    AlphabetTooShort {
        /// Length of the rejected alphabet.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },

    /// A custom hashid alphabet contains a non-ASCII or whitespace character.
    #[error("hashid alphabet contains invalid character {ch:?}")]
    AlphabetInvalidChar {
        /// The offending character.
        ch: char,
    },

    /// A custom hashid alphabet repeats a character.
    #[error("hashid alphabet contains duplicate character {ch:?}")]
    AlphabetDuplicateChar {
        /// The repeated character.
        ch: char,
    },

    /// A decimal ID string could not be parsed as an unsigned 64-bit value.
    #[error("invalid decimal id: {0}")]
    InvalidDecimal(#[from] ParseIntError),
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
