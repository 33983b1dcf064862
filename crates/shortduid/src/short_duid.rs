use crate::{
    DuidGenerator, Hashids, MonotonicClock, Result, TimeSource, random_api_key, random_password,
};

/// One shard's identifier service: a [`DuidGenerator`] paired with a salted
/// [`Hashids`] codec.
///
/// `ShortDuid` hands out IDs in two forms. [`Self::duid_int_batch`] returns
/// the 64-bit IDs as decimal strings (they exceed 2^53, so strings keep them
/// exact for JSON and JavaScript consumers). [`Self::duid_batch`] returns the
/// same kind of IDs run through the hashid codec, a short opaque form that
/// does not reveal creation order at a glance.
///
/// Like [`DuidGenerator`], a `ShortDuid` is single-threaded. Share one across
/// threads behind a mutex, or give each worker its own shard.
///
/// # Example
/// ```
/// use shortduid::{EPOCH_2015, ShortDuid};
///
/// let duid = ShortDuid::new(123, "my salt", EPOCH_2015);
///
/// let ids = duid.duid_int_batch(3);
/// assert_eq!(ids.len(), 3);
///
/// let short = duid.duid_batch(1);
/// let raw = duid.hashid_decode(&short[0]);
/// assert_eq!(raw.len(), 1);
///
/// assert_eq!(duid.hashid_decode(&duid.hashid_encode(&[1, 2, 3])), vec![1, 2, 3]);
/// ```
pub struct ShortDuid<T = MonotonicClock>
where
    T: TimeSource,
{
    generator: DuidGenerator<T>,
    hashids: Hashids,
}

impl ShortDuid<MonotonicClock> {
    /// Creates an instance for `shard_id` using a [`MonotonicClock`].
    ///
    /// `shard_id` wraps modulo 1024 and an `epoch_start` (milliseconds since
    /// the Unix epoch) in the future is replaced by `0`; neither is an error.
    pub fn new(shard_id: u64, salt: &str, epoch_start: u64) -> Self {
        Self::with_clock(shard_id, salt, epoch_start, MonotonicClock::new())
    }
}

impl<T> ShortDuid<T>
where
    T: TimeSource,
{
    /// Creates an instance reading time from `time`.
    pub fn with_clock(shard_id: u64, salt: &str, epoch_start: u64, time: T) -> Self {
        Self::from_parts(
            DuidGenerator::new(shard_id, epoch_start, time),
            Hashids::new(salt),
        )
    }

    /// Assembles an instance from a prepared generator and codec, e.g. one
    /// built with [`Hashids::with_config`].
    pub fn from_parts(generator: DuidGenerator<T>, hashids: Hashids) -> Self {
        Self { generator, hashids }
    }

    /// Returns `count` short (hashid) IDs.
    ///
    /// # ⚠️ Batch size
    /// `0` returns an empty vector and `1..=8192` returns exactly `count`
    /// IDs, but a request **above 8192 returns a single ID**. See
    /// [`crate::batch_len`].
    pub fn duid_batch(&self, count: usize) -> Vec<String> {
        self.generator
            .next_batch(count)
            .into_iter()
            .map(|id| self.hashids.encode(&[id.to_raw()]))
            .collect()
    }

    /// Returns `count` IDs as decimal strings, with the same batch-size
    /// policy as [`Self::duid_batch`].
    pub fn duid_int_batch(&self, count: usize) -> Vec<String> {
        self.generator
            .next_batch(count)
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    /// Encodes `values` with this instance's salt.
    pub fn hashid_encode(&self, values: &[u64]) -> String {
        self.hashids.encode(values)
    }

    /// Decodes a hashid produced with this instance's salt. Foreign or
    /// malformed input yields an empty vector.
    pub fn hashid_decode(&self, hashid: &str) -> Vec<u64> {
        self.hashids.decode(hashid)
    }

    /// Like [`Self::hashid_decode`], rendering each value as a decimal
    /// string.
    pub fn hashid_decode_str(&self, hashid: &str) -> Vec<String> {
        self.hashids.decode_str(hashid)
    }

    /// See [`crate::random_api_key`].
    ///
    /// # Errors
    /// - Returns an error if the OS random source fails.
    pub fn random_api_key(&self) -> Result<String> {
        random_api_key()
    }

    /// See [`crate::random_password`].
    ///
    /// # Errors
    /// - Returns an error if the OS random source fails.
    pub fn random_password(&self) -> Result<String> {
        random_password()
    }

    /// Epoch start in milliseconds since the Unix epoch, after the
    /// future-epoch check.
    pub const fn epoch_start(&self) -> u64 {
        self.generator.epoch_start()
    }

    /// Salt of the hashid codec.
    pub fn salt(&self) -> &str {
        self.hashids.salt()
    }

    /// Shard ID, already wrapped to 10 bits.
    pub const fn shard_id(&self) -> u64 {
        self.generator.shard_id()
    }

    /// Wall-clock milliseconds since the Unix epoch, including drift.
    pub fn current_time_ms(&self) -> i64 {
        self.generator.current_millis()
    }

    /// Sets the clock drift offset and returns it. See
    /// [`DuidGenerator::drift_time`].
    pub fn drift_time(&self, offset_ms: i64) -> i64 {
        self.generator.drift_time(offset_ms)
    }

    /// The underlying ID generator.
    pub fn generator(&self) -> &DuidGenerator<T> {
        &self.generator
    }

    /// The hashid codec used for the short form.
    pub fn hashids(&self) -> &Hashids {
        &self.hashids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_ALPHABET, Duid, SystemClock};
    use std::collections::HashSet;

    const SALT: &str = "39622feb2b3e7aa7208f50f45ec36fd513baadad6977b53295a3b28aeaed4a54";
    const EPOCH_START: u64 = 1_433_116_800;

    struct FixedTime(u64);

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    fn instances() -> (ShortDuid, ShortDuid) {
        (
            ShortDuid::new(123, SALT, EPOCH_START),
            ShortDuid::new(12, SALT, EPOCH_START),
        )
    }

    #[test]
    fn instances_share_encoding() {
        let (a, b) = instances();
        assert_eq!(a.hashid_encode(&[987_654_321]), b.hashid_encode(&[987_654_321]));
        assert_ne!(a.hashid_encode(&[1]), a.hashid_encode(&[2]));
        assert_eq!(a.hashid_encode(&[123456]), "LeGxr");
        assert_eq!(a.hashid_encode(&[123456, 7890, 123]), "reG4QhO4NCpm");
        assert_eq!(b.hashid_decode("LeGxr"), vec![123456]);
        assert_eq!(b.hashid_decode("reG4QhO4NCpm"), vec![123456, 7890, 123]);
        assert_eq!(
            b.hashid_decode(&a.hashid_encode(&[11, 222_333, 444_555_666])),
            vec![11, 222_333, 444_555_666]
        );
        assert_eq!(b.hashid_decode_str("LeGxr"), vec!["123456".to_string()]);
    }

    #[test]
    fn salt_sensitivity() {
        let a = ShortDuid::new(1, SALT, 0);
        let b = ShortDuid::new(1, "other", 0);
        assert_ne!(a.hashid_encode(&[123456]), b.hashid_encode(&[123456]));
    }

    #[test]
    fn accessors() {
        let (a, b) = instances();
        assert_eq!(a.epoch_start(), EPOCH_START);
        assert_eq!(b.epoch_start(), EPOCH_START);
        assert_eq!(a.salt(), SALT);
        assert_eq!(b.salt(), SALT);
        assert_eq!(a.shard_id(), 123);
        assert_eq!(b.shard_id(), 12);
        assert_eq!(ShortDuid::new(1024, SALT, 0).shard_id(), 0);
    }

    #[test]
    fn epoch_clamp() {
        let now = SystemClock.current_millis();
        assert_eq!(ShortDuid::new(0, SALT, now + 5_000).epoch_start(), 0);
        assert_eq!(ShortDuid::new(0, SALT, now - 1).epoch_start(), now - 1);
    }

    #[test]
    fn batch_sizes() {
        let (a, _) = instances();
        for (count, expected) in [(0, 0), (1, 1), (8192, 8192), (8193, 1)] {
            assert_eq!(a.duid_batch(count).len(), expected);
            assert_eq!(a.duid_int_batch(count).len(), expected);
        }
    }

    #[test]
    fn no_duplicates_within_or_across_shards() {
        let (a, b) = instances();
        let batches: [fn(&ShortDuid, usize) -> Vec<String>; 2] =
            [ShortDuid::duid_batch, ShortDuid::duid_int_batch];
        for batch in batches {
            let first = batch(&a, 8192);
            let second = batch(&b, 8192);
            let combined: HashSet<_> = first.iter().chain(&second).collect();
            assert_eq!(combined.len(), 2 * 8192);
        }
    }

    #[test]
    fn short_ids_decode_to_int_ids() {
        let duid = ShortDuid::with_clock(7, SALT, 0, FixedTime(5_000));
        let short = duid.duid_batch(2);
        let raw: Vec<u64> = short.iter().flat_map(|s| duid.hashid_decode(s)).collect();
        assert_eq!(
            raw,
            [
                Duid::from(5_000, 7, 0).to_raw(),
                Duid::from(5_000, 7, 1).to_raw()
            ]
        );
        assert_eq!(
            duid.duid_int_batch(1),
            [Duid::from(5_000, 7, 2).to_string()]
        );
    }

    #[test]
    fn int_ids_are_reproducible_for_fixed_clock() {
        let run = || ShortDuid::with_clock(3, SALT, 1_000, FixedTime(2_000)).duid_int_batch(4);
        assert_eq!(run(), run());
        assert_eq!(run()[0], ((1_000u64 << 23) | (3 << 13)).to_string());
    }

    #[test]
    fn backward_drift_still_increases() {
        let duid = ShortDuid::new(123, SALT, EPOCH_START);
        let id1: u64 = duid.duid_int_batch(1)[0].parse().unwrap();
        assert_eq!(duid.drift_time(-7_500), -7_500);
        let id2: u64 = duid.duid_int_batch(4096)[4095].parse().unwrap();
        let now = duid.current_time_ms();
        duid.drift_time(0);
        assert!(id2 > id1, "{id2} > {id1} at {now}");
        assert!(duid.current_time_ms() >= now);
    }

    #[test]
    fn tokens() {
        let (a, _) = instances();
        let keys: HashSet<_> = (0..10).map(|_| a.random_api_key().unwrap()).collect();
        assert_eq!(keys.len(), 10);
        assert!(keys.iter().all(|k| k.len() == 64));
        let passwords: HashSet<_> = (0..10).map(|_| a.random_password().unwrap()).collect();
        assert_eq!(passwords.len(), 10);
        assert!(passwords.iter().all(|p| p.len() == 16));
    }

    #[test]
    fn from_parts_uses_custom_codec() {
        let hashids = Hashids::with_config(SALT, 12, DEFAULT_ALPHABET).unwrap();
        let duid = ShortDuid::from_parts(DuidGenerator::new(1, 0, FixedTime(9)), hashids);
        assert_eq!(duid.hashid_encode(&[123456]), "QMezLeGxrVy0");
        assert!(duid.duid_batch(3).iter().all(|s| s.len() >= 12));
        assert_eq!(duid.hashids().min_length(), 12);
        assert_eq!(duid.generator().shard_id(), 1);
    }
}
