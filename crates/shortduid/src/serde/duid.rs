use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializes a [`Duid`] as its raw `u64`.
///
/// [`Duid`]: crate::Duid
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::Duid;

    /// Serialize a [`Duid`] as a plain `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Duid, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a [`Duid`] from a plain `u64`. Every `u64` is a valid ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<Duid, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(Duid::from_raw)
    }
}

/// Serializes a [`Duid`] as a decimal string.
///
/// IDs routinely exceed 2^53, the largest integer JavaScript and many JSON
/// parsers hold exactly, so this is the safe choice for JSON payloads.
///
/// [`Duid`]: crate::Duid
pub mod as_decimal_str {
    use super::{Deserializer, Serializer};
    use crate::Duid;

    /// Serialize a [`Duid`] as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Duid, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a [`Duid`] from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal `u64`
    pub fn deserialize<'de, D>(d: D) -> Result<Duid, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = Duid;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal ID string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}
