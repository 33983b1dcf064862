use crate::{Duid, Result};

/// Packs `(timestamp, shard_id, sequence)` and renders the ID in decimal.
///
/// The timestamp is milliseconds relative to the generator's epoch start and
/// is expected to fit in 41 bits; the shard ID in 10 bits and the sequence
/// in 13 bits. Wider values are masked to their field width.
///
/// ```
/// use shortduid::compose;
///
/// assert_eq!(compose(1, 0, 0), "8388608");
/// assert_eq!(compose(0, 1, 1), "8193");
/// ```
pub fn compose(timestamp: u64, shard_id: u64, sequence: u64) -> String {
    Duid::from(timestamp, shard_id, sequence).to_string()
}

/// Splits a decimal ID back into `(timestamp, shard_id, sequence)`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidDecimal`] if `id` is not an unsigned 64-bit
/// decimal number.
pub fn decompose(id: &str) -> Result<(u64, u64, u64)> {
    let id: Duid = id.parse()?;
    Ok((id.timestamp(), id.shard_id(), id.sequence()))
}
