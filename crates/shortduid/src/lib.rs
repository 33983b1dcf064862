//! # shortduid
//!
//! Distributed unique IDs (DUIDs) for sharded systems, plus a salted
//! short-string form of them and a couple of secure token helpers.
//!
//! A DUID is a 64-bit value laid out like a Twitter Snowflake:
//!
//! ```text
//!  Bit Index:  63             23 22           13 12             0
//!              +----------------+---------------+---------------+
//!  Field:      | timestamp (41) | shard ID (10) | sequence (13) |
//!              +----------------+---------------+---------------+
//!              |<----- MSB ---------- 64 bits --------- LSB --->|
//! ```
//!
//! - `timestamp`: milliseconds since the generator's epoch start.
//! - `shard ID`: which of up to 1024 generators issued the ID.
//! - `sequence`: up to 8192 IDs per shard per millisecond.
//!
//! IDs from one generator are strictly increasing. The generator never
//! waits for the clock: if the clock stalls, steps backward, or a
//! millisecond's sequence numbers run out, the logical timestamp moves one
//! millisecond ahead instead.
//!
//! ## Example
//!
//! ```
//! use shortduid::{EPOCH_2015, ShortDuid};
//!
//! let duid = ShortDuid::new(42, "a secret salt", EPOCH_2015);
//!
//! // Decimal strings, exact even past 2^53.
//! let ids = duid.duid_int_batch(2);
//! assert!(ids[0].parse::<u64>().unwrap() < ids[1].parse::<u64>().unwrap());
//!
//! // Short opaque form.
//! let short = duid.duid_batch(1);
//! assert_eq!(duid.hashid_decode(&short[0]).len(), 1);
//!
//! // Secure tokens.
//! assert_eq!(duid.random_api_key()?.len(), 64);
//! assert_eq!(duid.random_password()?.len(), 16);
//! # Ok::<(), shortduid::Error>(())
//! ```
//!
//! ## Building blocks
//!
//! - [`DuidGenerator`]: single-threaded generator over any [`TimeSource`].
//! - [`LockDuidGenerator`]: cloneable, thread-safe wrapper.
//! - [`Duid`], [`compose`] and [`decompose`]: the ID value and its fields.
//! - [`Hashids`]: the salted reversible codec behind the short form. It
//!   obfuscates, it does not encrypt.
//! - [`random_api_key`] and [`random_password`]: OS-backed random tokens.
//!
//! ## Features
//!
//! - `parking-lot`: use `parking_lot::Mutex` in [`LockDuidGenerator`].
//! - `serde`: `#[serde(with = "...")]` helpers for [`Duid`].
//! - `tracing`: emit `tracing` events on clock anomalies and clamped
//!   inputs.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod hashids;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod short_duid;
mod time;
mod token;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::hashids::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::short_duid::*;
pub use crate::time::*;
pub use crate::token::*;
