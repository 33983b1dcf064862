use crate::{Error, Result};

/// The alphabet used by [`crate::Hashids::new`]: lower-case letters,
/// upper-case letters, then digits.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// The fewest unique characters a custom alphabet may have.
pub const MIN_ALPHABET_LENGTH: usize = 16;

/// Characters preferred as separators between encoded numbers.
const SEPARATORS: &[u8] = b"cfhistuCFHISTU";

/// Alphabet characters per separator.
const SEPARATOR_RATIO_NUM: usize = 7;
const SEPARATOR_RATIO_DEN: usize = 2;

/// Alphabet characters per guard.
const GUARD_RATIO: usize = 12;

/// The three disjoint character sets an encoder works with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Tables {
    pub(super) alphabet: Vec<u8>,
    pub(super) separators: Vec<u8>,
    pub(super) guards: Vec<u8>,
}

impl Tables {
    /// Splits a validated alphabet into digits, separators and guards, each
    /// permuted by `salt`.
    pub(super) fn build(mut alphabet: Vec<u8>, salt: &[u8]) -> Self {
        let mut separators: Vec<u8> = SEPARATORS
            .iter()
            .copied()
            .filter(|c| alphabet.contains(c))
            .collect();
        alphabet.retain(|c| !separators.contains(c));
        consistent_shuffle(&mut separators, salt);

        // ceil(len / 3.5)
        let mut min_separators =
            (SEPARATOR_RATIO_DEN * alphabet.len()).div_ceil(SEPARATOR_RATIO_NUM);
        if separators.len() < min_separators {
            if min_separators == 1 {
                min_separators = 2;
            }
            let split_at = (min_separators - separators.len()).min(alphabet.len());
            separators.extend(alphabet.drain(..split_at));
        }

        consistent_shuffle(&mut alphabet, salt);

        let guard_count = alphabet.len().div_ceil(GUARD_RATIO);
        let guards = if alphabet.len() < 3 {
            separators.drain(..guard_count).collect()
        } else {
            alphabet.drain(..guard_count).collect()
        };

        Self {
            alphabet,
            separators,
            guards,
        }
    }
}

/// Checks that `alphabet` can drive the codec and returns it as bytes.
///
/// # Errors
/// - [`Error::AlphabetInvalidChar`] for non-ASCII, whitespace or control
///   characters.
/// - [`Error::AlphabetDuplicateChar`] for repeated characters.
/// - [`Error::AlphabetTooShort`] for fewer than [`MIN_ALPHABET_LENGTH`]
///   characters.
pub(super) fn validate(alphabet: &str) -> Result<Vec<u8>> {
    let mut seen = [false; 128];
    let mut bytes = Vec::with_capacity(alphabet.len());
    for ch in alphabet.chars() {
        let byte = u8::try_from(ch)
            .ok()
            .filter(|b| b.is_ascii_graphic())
            .ok_or(Error::AlphabetInvalidChar { ch })?;
        let slot = &mut seen[usize::from(byte)];
        if *slot {
            return Err(Error::AlphabetDuplicateChar { ch });
        }
        *slot = true;
        bytes.push(byte);
    }
    if bytes.len() < MIN_ALPHABET_LENGTH {
        return Err(Error::AlphabetTooShort {
            len: bytes.len(),
            min: MIN_ALPHABET_LENGTH,
        });
    }
    Ok(bytes)
}

/// Deterministically permutes `values` using `salt`. An empty salt leaves
/// the input untouched.
pub(super) fn consistent_shuffle(values: &mut [u8], salt: &[u8]) {
    if salt.is_empty() {
        return;
    }
    let mut p = 0usize;
    for (v, i) in (1..values.len()).rev().enumerate() {
        let v = v % salt.len();
        let s = usize::from(salt[v]);
        p += s;
        let j = (s + v + p) % i;
        values.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8] = b"39622feb2b3e7aa7208f50f45ec36fd513baadad6977b53295a3b28aeaed4a54";

    #[test]
    fn default_tables_for_salt() {
        let tables = Tables::build(DEFAULT_ALPHABET.as_bytes().to_vec(), SALT);
        assert_eq!(
            tables.alphabet,
            b"yrOQxMG864pkLXJZEAKv7alPgWoqDdYje5B092nwb1Nm"
        );
        assert_eq!(tables.separators, b"sciFuUhTCftHIS");
        assert_eq!(tables.guards, b"zV3R");
    }

    #[test]
    fn tables_are_disjoint_and_complete() {
        let tables = Tables::build(b"0123456789abcdef".to_vec(), b"salt");
        let mut all: Vec<u8> = tables
            .alphabet
            .iter()
            .chain(&tables.separators)
            .chain(&tables.guards)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, b"0123456789abcdef");
        assert_eq!(tables.separators.len(), 4);
        assert_eq!(tables.guards.len(), 1);
        assert_eq!(tables.alphabet.len(), 11);
    }

    #[test]
    fn empty_salt_does_not_shuffle() {
        let mut values = *b"abcdef";
        consistent_shuffle(&mut values, b"");
        assert_eq!(&values, b"abcdef");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut values = *b"abcdefghijklmnop";
        consistent_shuffle(&mut values, b"pepper");
        assert_ne!(&values, b"abcdefghijklmnop");
        values.sort_unstable();
        assert_eq!(&values, b"abcdefghijklmnop");
    }

    #[test]
    fn validation_errors() {
        assert_eq!(
            validate("abc"),
            Err(Error::AlphabetTooShort { len: 3, min: 16 })
        );
        assert_eq!(
            validate("abcdefgh ijklmnopq"),
            Err(Error::AlphabetInvalidChar { ch: ' ' })
        );
        assert_eq!(
            validate("abcdéfghijklmnopq"),
            Err(Error::AlphabetInvalidChar { ch: 'é' })
        );
        assert_eq!(
            validate("abcdefghijklmnopa"),
            Err(Error::AlphabetDuplicateChar { ch: 'a' })
        );
        assert!(validate(DEFAULT_ALPHABET).is_ok());
    }
}
