use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use shortduid::{
    API_KEY_LENGTH, DEFAULT_ALPHABET, Duid, Hashids, MAX_API_KEY_LENGTH, MAX_BATCH_SIZE,
    MAX_PASSWORD_LENGTH, PASSWORD_LENGTH,
};

/// Longest padded hashid the CLI will produce.
const MAX_MIN_LENGTH: usize = 4096;

/// Command-line configuration for the `shortduid` binary.
///
/// Generator settings can be given as flags, environment variables or in a
/// `.env` file. They are validated into an [`AppConfig`] before any ID is
/// produced.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shortduid",
    version,
    about = "Generate sortable shard IDs, hashids and secure tokens"
)]
pub struct CliArgs {
    /// Shard this process generates IDs for. Wraps modulo 1024.
    ///
    /// Environment variable: `SHARD_ID`
    #[arg(long, env = "SHARD_ID", default_value_t = 0, global = true)]
    pub shard_id: u64,

    /// Salt for the hashid codec. Every service that must read another's
    /// short IDs needs the same salt.
    ///
    /// Environment variable: `DUID_SALT`
    #[arg(long, env = "DUID_SALT", default_value_t = String::new(), hide_env_values = true, global = true)]
    pub salt: String,

    /// Epoch start in milliseconds since the Unix epoch. A value in the
    /// future falls back to 0.
    ///
    /// Environment variable: `EPOCH_START`
    #[arg(long, env = "EPOCH_START", default_value_t = 0, global = true)]
    pub epoch_start: u64,

    /// Minimum length of encoded hashids.
    ///
    /// Environment variable: `HASHID_MIN_LENGTH`
    #[arg(long, env = "HASHID_MIN_LENGTH", default_value_t = 0, global = true)]
    pub min_length: usize,

    /// Alphabet for the hashid codec: at least 16 unique, printable ASCII
    /// characters.
    ///
    /// Environment variable: `HASHID_ALPHABET`
    #[arg(long, env = "HASHID_ALPHABET", default_value_t = String::from(DEFAULT_ALPHABET), global = true)]
    pub alphabet: String,

    /// Print results as JSON.
    #[arg(long, default_value_t = false, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate short (hashid) IDs. More than 8192 yields a single ID.
    Duid {
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Generate IDs as decimal strings. More than 8192 yields a single ID.
    Int {
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Encode non-negative integers into one hashid.
    Encode {
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Decode a hashid back into its integers.
    Decode { hashid: String },
    /// Split a decimal ID into timestamp, shard ID and sequence.
    Inspect { id: String },
    /// Generate a random alphanumeric API key.
    ApiKey {
        #[arg(long, default_value_t = API_KEY_LENGTH)]
        len: usize,
    },
    /// Generate a random password.
    Password {
        #[arg(long, default_value_t = PASSWORD_LENGTH)]
        len: usize,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub shard_id: u64,
    pub epoch_start: u64,
    pub hashids: Hashids,
    pub json: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.shard_id > Duid::max_shard_id() {
            tracing::warn!(
                "SHARD_ID ({}) exceeds {}, it wraps to {}",
                args.shard_id,
                Duid::max_shard_id(),
                args.shard_id & Duid::max_shard_id()
            );
        }

        match &args.command {
            Command::Duid { count } | Command::Int { count } if *count > MAX_BATCH_SIZE => {
                tracing::warn!(
                    "requested {count} IDs, more than {MAX_BATCH_SIZE} returns a single ID"
                );
            }
            Command::ApiKey { len } if *len > MAX_API_KEY_LENGTH => {
                tracing::warn!(
                    "--len ({len}) exceeds {MAX_API_KEY_LENGTH}, using {API_KEY_LENGTH}"
                );
            }
            Command::Password { len } if *len > MAX_PASSWORD_LENGTH => {
                tracing::warn!(
                    "--len ({len}) exceeds {MAX_PASSWORD_LENGTH}, using {PASSWORD_LENGTH}"
                );
            }
            _ => {}
        }

        if args.min_length > MAX_MIN_LENGTH {
            bail!(
                "HASHID_MIN_LENGTH ({}) exceeds the supported maximum ({MAX_MIN_LENGTH})",
                args.min_length
            );
        }

        let hashids = Hashids::with_config(&args.salt, args.min_length, &args.alphabet)
            .context("HASHID_ALPHABET is not usable")?;

        Ok(Self {
            shard_id: args.shard_id,
            epoch_start: args.epoch_start,
            hashids,
            json: args.json,
            command: args.command,
        })
    }
}
