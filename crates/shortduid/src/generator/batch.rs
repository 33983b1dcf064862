/// Largest batch a single request may ask for: one full sequence range.
pub const MAX_BATCH_SIZE: usize = 1 << 13;

/// Returns how many IDs a batch request for `count` actually yields.
///
/// - `0` yields an empty batch.
/// - `1..=MAX_BATCH_SIZE` yields exactly `count` IDs.
/// - Anything larger is **not** clamped: it is treated as an invalid request
///   and yields a single ID. Existing callers depend on this, so do not rely
///   on requesting more than [`MAX_BATCH_SIZE`] at once.
///
/// ```
/// use shortduid::{batch_len, MAX_BATCH_SIZE};
///
/// assert_eq!(batch_len(0), 0);
/// assert_eq!(batch_len(MAX_BATCH_SIZE), MAX_BATCH_SIZE);
/// assert_eq!(batch_len(MAX_BATCH_SIZE + 1), 1);
/// ```
pub const fn batch_len(count: usize) -> usize {
    if count > MAX_BATCH_SIZE { 1 } else { count }
}
