use core::{fmt, str::FromStr};

use crate::Error;

/// A 64-bit sortable identifier minted by one shard.
///
/// - 41 bits timestamp (ms since the generator's epoch start)
/// - 10 bits shard ID
/// - 13 bits sequence
///
/// ```text
///  Bit Index:  63             23 22             13 12             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (41) |  shard ID (10)  | sequence (13) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// The full 64 bits are used, so the raw value routinely exceeds the 2^53
/// range that double-precision numbers represent exactly. Hand it to such
/// consumers as a decimal string ([`fmt::Display`]) rather than a number.
///
/// # Example
///
/// ```
/// use shortduid::Duid;
///
/// let id = Duid::from(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.shard_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_string(), "8388624385");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duid {
    id: u64,
}

impl Duid {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 23
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 10-bit shard ID field. Occupies bits 13
    /// through 22.
    pub const SHARD_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 13-bit sequence field. Occupies bits 0
    /// through 12.
    pub const SEQUENCE_MASK: u64 = (1 << 13) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 23).
    pub const TIMESTAMP_SHIFT: u64 = 23;

    /// Number of bits to shift the shard ID to its correct position (bit 13).
    pub const SHARD_ID_SHIFT: u64 = 13;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID, masking each one to its width.
    pub const fn from(timestamp: u64, shard_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let shard_id = (shard_id & Self::SHARD_ID_MASK) << Self::SHARD_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | shard_id | sequence,
        }
    }

    /// Wraps a raw packed value.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the shard ID from the packed ID.
    pub const fn shard_id(&self) -> u64 {
        (self.id >> Self::SHARD_ID_SHIFT) & Self::SHARD_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable shard ID.
    pub const fn max_shard_id() -> u64 {
        Self::SHARD_ID_MASK
    }

    /// Returns the maximum representable sequence value.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns true if the current sequence value can be incremented.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        Self::from(self.timestamp(), self.shard_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from(ts, self.shard_id(), 0)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexically in the same order as the IDs sort
    /// numerically.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for Duid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for Duid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Duid")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("shard_id", &self.shard_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for Duid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s.trim().parse()?))
    }
}

impl From<Duid> for u64 {
    fn from(id: Duid) -> Self {
        id.to_raw()
    }
}

impl From<u64> for Duid {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}
