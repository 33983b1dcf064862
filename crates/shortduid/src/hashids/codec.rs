use super::alphabet::{DEFAULT_ALPHABET, Tables, consistent_shuffle, validate};
use crate::Result;

/// A salted, reversible encoder between lists of `u64` and short strings.
///
/// The salt permutes the alphabet, so two codecs built from the same salt
/// (and options) encode and decode identically, while a different salt
/// yields different strings for the same numbers.
///
/// This is obfuscation, not encryption: anyone who knows the salt can
/// decode, and the salt can be recovered from enough samples.
///
/// # Example
/// ```
/// use shortduid::Hashids;
///
/// let hashids = Hashids::new("this is my salt");
/// let code = hashids.encode(&[1, 2, 3]);
/// assert_eq!(code, "laHquq");
/// assert_eq!(hashids.decode(&code), vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hashids {
    salt: String,
    min_length: usize,
    tables: Tables,
}

impl Default for Hashids {
    fn default() -> Self {
        Self::new("")
    }
}

impl Hashids {
    /// Creates a codec over [`DEFAULT_ALPHABET`] with no minimum length.
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.to_owned(),
            min_length: 0,
            tables: Tables::build(DEFAULT_ALPHABET.as_bytes().to_vec(), salt.as_bytes()),
        }
    }

    /// Creates a codec with a minimum output length and a custom alphabet.
    ///
    /// Encodings shorter than `min_length` are padded with guard and
    /// alphabet characters; decoding strips the padding again.
    ///
    /// # Errors
    /// - Returns an error if `alphabet` has fewer than
    ///   [`crate::MIN_ALPHABET_LENGTH`] characters, repeats a character, or
    ///   contains whitespace or non-ASCII characters.
    ///
    /// # Example
    /// ```
    /// use shortduid::{DEFAULT_ALPHABET, Hashids};
    ///
    /// let hashids = Hashids::with_config("this is my salt", 8, DEFAULT_ALPHABET)?;
    /// assert_eq!(hashids.encode(&[1]), "gB0NV05e");
    /// # Ok::<(), shortduid::Error>(())
    /// ```
    pub fn with_config(salt: &str, min_length: usize, alphabet: &str) -> Result<Self> {
        let alphabet = validate(alphabet)?;
        Ok(Self {
            salt: salt.to_owned(),
            min_length,
            tables: Tables::build(alphabet, salt.as_bytes()),
        })
    }

    /// Returns the salt this codec was built with.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the minimum encoded length (`0` means none).
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encodes `values` into a string. An empty slice encodes to an empty
    /// string.
    pub fn encode(&self, values: &[u64]) -> String {
        if values.is_empty() {
            return String::new();
        }

        let Tables {
            alphabet,
            separators,
            ..
        } = &self.tables;
        let mut alphabet = alphabet.clone();
        let mut salt_buf = Vec::with_capacity(alphabet.len() + self.salt.len() + 1);

        let values_hash = values_hash(values);
        let lottery = alphabet[index(values_hash, alphabet.len())];

        let mut out = Vec::with_capacity(self.min_length.max(values.len() * 4));
        out.push(lottery);

        for (i, &value) in values.iter().enumerate() {
            self.lottery_shuffle(&mut alphabet, lottery, &mut salt_buf);
            let start = out.len();
            push_digits(value, &alphabet, &mut out);

            if i + 1 < values.len() {
                let modulus = u64::from(out[start]) + i as u64;
                out.push(separators[index(value % modulus, separators.len())]);
            }
        }

        if out.len() < self.min_length {
            self.pad(&mut out, &mut alphabet, values_hash);
        }

        out.into_iter().map(char::from).collect()
    }

    /// Decodes a string produced by [`Self::encode`] with the same salt and
    /// options.
    ///
    /// Decoding never fails loudly: input that was not produced by this
    /// codec (wrong salt, foreign characters, overflowing values) yields an
    /// empty vector. A decoded list is only returned when re-encoding it
    /// reproduces `hashid` exactly.
    pub fn decode(&self, hashid: &str) -> Vec<u64> {
        match self.decode_unchecked(hashid.as_bytes()) {
            Some(values) if !values.is_empty() && self.encode(&values) == hashid => values,
            _ => Vec::new(),
        }
    }

    /// Like [`Self::decode`], with every value rendered as a decimal string.
    ///
    /// ```
    /// use shortduid::Hashids;
    ///
    /// let hashids = Hashids::new("this is my salt");
    /// assert_eq!(hashids.decode_str("NkK9"), vec!["12345".to_string()]);
    /// ```
    pub fn decode_str(&self, hashid: &str) -> Vec<String> {
        self.decode(hashid).iter().map(u64::to_string).collect()
    }

    fn decode_unchecked(&self, hashid: &[u8]) -> Option<Vec<u64>> {
        let parts = split(hashid, &self.tables.guards);
        let body = match parts.as_slice() {
            [] => return None,
            [only] => *only,
            [_, second, ..] => *second,
        };
        let (&lottery, rest) = body.split_first()?;

        let mut alphabet = self.tables.alphabet.clone();
        let mut salt_buf = Vec::with_capacity(alphabet.len() + self.salt.len() + 1);
        split(rest, &self.tables.separators)
            .into_iter()
            .map(|part| {
                self.lottery_shuffle(&mut alphabet, lottery, &mut salt_buf);
                parse_digits(part, &alphabet)
            })
            .collect()
    }

    /// Reshuffles `alphabet` with `lottery + salt + alphabet`, cut to the
    /// alphabet's length.
    fn lottery_shuffle(&self, alphabet: &mut [u8], lottery: u8, salt_buf: &mut Vec<u8>) {
        salt_buf.clear();
        salt_buf.push(lottery);
        salt_buf.extend_from_slice(self.salt.as_bytes());
        salt_buf.extend_from_slice(alphabet);
        salt_buf.truncate(alphabet.len());
        consistent_shuffle(alphabet, salt_buf);
    }

    /// Grows `out` to `min_length`: first with up to two guards, then by
    /// wrapping it in halves of a repeatedly self-shuffled alphabet and
    /// keeping the centre.
    fn pad(&self, out: &mut Vec<u8>, alphabet: &mut [u8], values_hash: u64) {
        let guards = &self.tables.guards;

        let guard = guards[index(values_hash + u64::from(out[0]), guards.len())];
        out.insert(0, guard);

        if out.len() < self.min_length {
            let guard = guards[index(values_hash + u64::from(out[2]), guards.len())];
            out.push(guard);
        }

        let half = alphabet.len() / 2;
        let mut salt = Vec::with_capacity(alphabet.len());
        while out.len() < self.min_length {
            salt.clear();
            salt.extend_from_slice(alphabet);
            consistent_shuffle(alphabet, &salt);

            let mut padded = Vec::with_capacity(out.len() + alphabet.len());
            padded.extend_from_slice(&alphabet[half..]);
            padded.extend_from_slice(out);
            padded.extend_from_slice(&alphabet[..half]);

            let excess = padded.len().saturating_sub(self.min_length);
            if excess > 0 {
                padded.drain(..excess / 2);
                padded.truncate(self.min_length);
            }
            *out = padded;
        }
    }
}

fn values_hash(values: &[u64]) -> u64 {
    values
        .iter()
        .zip(100u64..)
        .fold(0u64, |acc, (&value, modulus)| {
            acc.wrapping_add(value % modulus)
        })
}

#[inline]
fn index(value: u64, len: usize) -> usize {
    // `len` is a table length, far below `u64::MAX`, so the remainder fits.
    (value % len as u64) as usize
}

/// Appends `value` in base `alphabet.len()`, most significant digit first.
fn push_digits(mut value: u64, alphabet: &[u8], out: &mut Vec<u8>) {
    let base = alphabet.len() as u64;
    let start = out.len();
    loop {
        out.push(alphabet[index(value, alphabet.len())]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    out[start..].reverse();
}

/// Inverse of [`push_digits`]. `None` on an empty part, a character outside
/// `alphabet`, or overflow.
fn parse_digits(part: &[u8], alphabet: &[u8]) -> Option<u64> {
    if part.is_empty() {
        return None;
    }
    let base = alphabet.len() as u64;
    part.iter().try_fold(0u64, |acc, c| {
        let digit = alphabet.iter().position(|a| a == c)? as u64;
        acc.checked_mul(base)?.checked_add(digit)
    })
}

/// Splits on any of `splitters`, dropping a trailing empty part.
fn split<'a>(input: &'a [u8], splitters: &[u8]) -> Vec<&'a [u8]> {
    let mut parts: Vec<&[u8]> = input.split(|c| splitters.contains(c)).collect();
    if parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}
