use rand::{TryCryptoRng, TryRngCore, rngs::OsRng};

use crate::{Error, Result};

/// Characters used for API keys: digits, then lower- and upper-case
/// letters.
pub const API_KEY_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters used for passwords: 24 symbols followed by
/// [`API_KEY_ALPHABET`].
pub const PASSWORD_ALPHABET: &str =
    "!#$%&()=-~^[{]};+:*_?/><0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of [`random_api_key`] output.
pub const API_KEY_LENGTH: usize = 64;

/// Longest accepted API key; longer requests fall back to
/// [`API_KEY_LENGTH`].
pub const MAX_API_KEY_LENGTH: usize = 4096;

/// Length of [`random_password`] output.
pub const PASSWORD_LENGTH: usize = 16;

/// Longest accepted password; longer requests fall back to
/// [`PASSWORD_LENGTH`].
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// Returns a 64-character alphanumeric key drawn from the operating
/// system's secure random source.
///
/// # Errors
/// - [`Error::RandomSource`] if the OS random source fails.
///
/// # Example
/// ```
/// let key = shortduid::random_api_key()?;
/// assert_eq!(key.len(), 64);
/// assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
/// # Ok::<(), shortduid::Error>(())
/// ```
pub fn random_api_key() -> Result<String> {
    random_api_key_with_len(API_KEY_LENGTH)
}

/// Like [`random_api_key`] with a chosen length. A `len` above
/// [`MAX_API_KEY_LENGTH`] yields the default length instead.
///
/// # Errors
/// - [`Error::RandomSource`] if the OS random source fails.
pub fn random_api_key_with_len(len: usize) -> Result<String> {
    let len = if len > MAX_API_KEY_LENGTH {
        API_KEY_LENGTH
    } else {
        len
    };
    random_string(&mut OsRng, len, API_KEY_ALPHABET.as_bytes())
}

/// Returns a 16-character password over [`PASSWORD_ALPHABET`] drawn from
/// the operating system's secure random source.
///
/// # Errors
/// - [`Error::RandomSource`] if the OS random source fails.
pub fn random_password() -> Result<String> {
    random_password_with_len(PASSWORD_LENGTH)
}

/// Like [`random_password`] with a chosen length. A `len` above
/// [`MAX_PASSWORD_LENGTH`] yields the default length instead.
///
/// # Errors
/// - [`Error::RandomSource`] if the OS random source fails.
pub fn random_password_with_len(len: usize) -> Result<String> {
    let len = if len > MAX_PASSWORD_LENGTH {
        PASSWORD_LENGTH
    } else {
        len
    };
    random_string(&mut OsRng, len, PASSWORD_ALPHABET.as_bytes())
}

/// Draws `len` characters uniformly from `alphabet` (ASCII, 1..=256
/// entries).
///
/// Bytes at or above the largest multiple of `alphabet.len()` are discarded
/// so every character is equally likely.
fn random_string<R>(rng: &mut R, len: usize, alphabet: &[u8]) -> Result<String>
where
    R: TryCryptoRng + ?Sized,
{
    debug_assert!(!alphabet.is_empty() && alphabet.len() <= 256);
    let zone = 256 - 256 % alphabet.len();

    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 64];
    while out.len() < len {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| Error::RandomSource(e.to_string()))?;
        for &byte in buf.iter().filter(|&&b| usize::from(b) < zone) {
            if out.len() == len {
                break;
            }
            out.push(char::from(alphabet[usize::from(byte) % alphabet.len()]));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::TryRngCore;
    use std::collections::HashSet;

    /// Emits 0, 1, 2, ... wrapping at 256.
    struct CountingRng(u8);

    impl TryRngCore for CountingRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            let mut bytes = [0; 4];
            self.try_fill_bytes(&mut bytes)?;
            Ok(u32::from_le_bytes(bytes))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            let mut bytes = [0; 8];
            self.try_fill_bytes(&mut bytes)?;
            Ok(u64::from_le_bytes(bytes))
        }

        fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
            for byte in dst {
                *byte = self.0;
                self.0 = self.0.wrapping_add(1);
            }
            Ok(())
        }
    }

    impl TryCryptoRng for CountingRng {}

    struct FailingRng;

    impl TryRngCore for FailingRng {
        type Error = &'static str;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err("entropy unavailable")
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err("entropy unavailable")
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err("entropy unavailable")
        }
    }

    impl TryCryptoRng for FailingRng {}

    #[test]
    fn default_lengths_and_alphabets() {
        let key = random_api_key().unwrap();
        assert_eq!(key.len(), API_KEY_LENGTH);
        assert!(key.bytes().all(|b| API_KEY_ALPHABET.as_bytes().contains(&b)));

        let password = random_password().unwrap();
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert!(
            password
                .bytes()
                .all(|b| PASSWORD_ALPHABET.as_bytes().contains(&b))
        );
    }

    #[test]
    fn alphabets_have_expected_sizes() {
        assert_eq!(API_KEY_ALPHABET.len(), 62);
        assert_eq!(PASSWORD_ALPHABET.len(), 86);
        let unique: HashSet<_> = PASSWORD_ALPHABET.bytes().collect();
        assert_eq!(unique.len(), 86);
    }

    #[test]
    fn explicit_lengths() {
        assert_eq!(random_api_key_with_len(0).unwrap(), "");
        assert_eq!(random_api_key_with_len(10).unwrap().len(), 10);
        assert_eq!(random_api_key_with_len(4096).unwrap().len(), 4096);
        assert_eq!(random_api_key_with_len(4097).unwrap().len(), 64);

        assert_eq!(random_password_with_len(32).unwrap().len(), 32);
        assert_eq!(random_password_with_len(1024).unwrap().len(), 1024);
        assert_eq!(random_password_with_len(1025).unwrap().len(), 16);
    }

    #[test]
    fn consecutive_keys_differ() {
        let keys: HashSet<_> = (0..32).map(|_| random_api_key().unwrap()).collect();
        assert_eq!(keys.len(), 32);
    }

    #[test]
    fn rejects_bytes_outside_the_uniform_zone() {
        // 62 * 4 = 248, so 248..=255 are skipped.
        let mut rng = CountingRng(246);
        let out = random_string(&mut rng, 4, API_KEY_ALPHABET.as_bytes()).unwrap();
        // 246 % 62 = 60, 247 % 62 = 61, then 0 and 1.
        assert_eq!(out, "YZ01");
    }

    #[test]
    fn power_of_two_alphabet_uses_every_byte() {
        let mut rng = CountingRng(0);
        let out = random_string(&mut rng, 20, b"0123456789abcdef").unwrap();
        assert_eq!(out, "0123456789abcdef0123");
    }

    #[test]
    fn random_source_failure_is_reported() {
        let err = random_string(&mut FailingRng, 8, API_KEY_ALPHABET.as_bytes()).unwrap_err();
        assert_eq!(err, Error::RandomSource("entropy unavailable".to_string()));
    }
}
