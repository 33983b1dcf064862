use std::io::Write;

use anyhow::{Context, bail};
use serde::Serialize;
use shortduid::{
    DuidGenerator, MonotonicClock, ShortDuid, TimeSource, decompose, random_api_key_with_len,
    random_password_with_len,
};

use crate::config::{AppConfig, Command};

/// The result of one command, printed as text or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Strings(Vec<String>),
    Numbers(Vec<u64>),
    Text(String),
    Inspect(Inspection),
}

/// The fields of a decimal ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub id: String,
    /// Milliseconds since the epoch start.
    pub timestamp: u64,
    /// Milliseconds since the Unix epoch.
    pub unix_millis: u64,
    pub shard_id: u64,
    pub sequence: u64,
}

/// Builds the generator described by `config`, runs its command and writes
/// the result to `out`.
pub fn run<W: Write>(config: AppConfig, out: &mut W) -> anyhow::Result<()> {
    let AppConfig {
        shard_id,
        epoch_start,
        hashids,
        json,
        command,
    } = config;

    let duid = ShortDuid::from_parts(
        DuidGenerator::new(shard_id, epoch_start, MonotonicClock::new()),
        hashids,
    );
    tracing::debug!(
        shard_id = duid.shard_id(),
        epoch_start = duid.epoch_start(),
        "generator ready"
    );

    let output = execute(&duid, command)?;
    write_output(out, &output, json)
}

pub fn execute<T: TimeSource>(duid: &ShortDuid<T>, command: Command) -> anyhow::Result<Output> {
    let output = match command {
        Command::Duid { count } => Output::Strings(duid.duid_batch(count)),
        Command::Int { count } => Output::Strings(duid.duid_int_batch(count)),
        Command::Encode { values } => Output::Text(duid.hashid_encode(&values)),
        Command::Decode { hashid } => {
            let values = duid.hashid_decode(&hashid);
            if values.is_empty() {
                bail!("{hashid:?} is not a hashid for this salt and alphabet");
            }
            Output::Numbers(values)
        }
        Command::Inspect { id } => {
            let (timestamp, shard_id, sequence) =
                decompose(&id).with_context(|| format!("cannot inspect {id:?}"))?;
            Output::Inspect(Inspection {
                unix_millis: duid.epoch_start().saturating_add(timestamp),
                id,
                timestamp,
                shard_id,
                sequence,
            })
        }
        Command::ApiKey { len } => Output::Text(random_api_key_with_len(len)?),
        Command::Password { len } => Output::Text(random_password_with_len(len)?),
    };
    Ok(output)
}

pub fn write_output<W: Write>(out: &mut W, output: &Output, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, output)?;
        writeln!(out)?;
        return Ok(());
    }

    match output {
        Output::Strings(values) => {
            for value in values {
                writeln!(out, "{value}")?;
            }
        }
        Output::Numbers(values) => {
            for value in values {
                writeln!(out, "{value}")?;
            }
        }
        Output::Text(text) => writeln!(out, "{text}")?,
        Output::Inspect(inspection) => {
            writeln!(out, "id:          {}", inspection.id)?;
            writeln!(out, "timestamp:   {}", inspection.timestamp)?;
            writeln!(out, "unix_millis: {}", inspection.unix_millis)?;
            writeln!(out, "shard_id:    {}", inspection.shard_id)?;
            writeln!(out, "sequence:    {}", inspection.sequence)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortduid::{Duid, EPOCH_2015};

    const SALT: &str = "39622feb2b3e7aa7208f50f45ec36fd513baadad6977b53295a3b28aeaed4a54";

    struct FixedTime(u64);

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    fn render(output: &Output, json: bool) -> String {
        let mut buf = Vec::new();
        write_output(&mut buf, output, json).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn int_ids_follow_the_clock() {
        let duid = ShortDuid::with_clock(2, SALT, 0, FixedTime(1_000));
        let output = execute(&duid, Command::Int { count: 2 }).unwrap();
        assert_eq!(
            output,
            Output::Strings(vec![
                Duid::from(1_000, 2, 0).to_string(),
                Duid::from(1_000, 2, 1).to_string(),
            ])
        );
        assert_eq!(
            render(&output, false),
            format!(
                "{}\n{}\n",
                Duid::from(1_000, 2, 0),
                Duid::from(1_000, 2, 1)
            )
        );
    }

    #[test]
    fn short_ids_decode() {
        let duid = ShortDuid::with_clock(2, SALT, 0, FixedTime(1_000));
        let Output::Strings(ids) = execute(&duid, Command::Duid { count: 3 }).unwrap() else {
            panic!("expected strings");
        };
        assert_eq!(ids.len(), 3);
        let decoded = execute(
            &duid,
            Command::Decode {
                hashid: ids[1].clone(),
            },
        )
        .unwrap();
        assert_eq!(decoded, Output::Numbers(vec![Duid::from(1_000, 2, 1).to_raw()]));
    }

    #[test]
    fn encode_and_decode() {
        let duid = ShortDuid::new(0, SALT, 0);
        let output = execute(
            &duid,
            Command::Encode {
                values: vec![123456, 7890, 123],
            },
        )
        .unwrap();
        assert_eq!(output, Output::Text("reG4QhO4NCpm".to_string()));
        assert_eq!(render(&output, true), "\"reG4QhO4NCpm\"\n");

        let output = execute(
            &duid,
            Command::Decode {
                hashid: "reG4QhO4NCpm".to_string(),
            },
        )
        .unwrap();
        assert_eq!(render(&output, true), "[123456,7890,123]\n");
        assert_eq!(render(&output, false), "123456\n7890\n123\n");
    }

    #[test]
    fn decode_of_foreign_hashid_fails() {
        let duid = ShortDuid::new(0, "other", 0);
        assert!(
            execute(
                &duid,
                Command::Decode {
                    hashid: "LeGxr".to_string()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn inspect_reports_fields() {
        let duid = ShortDuid::with_clock(0, SALT, EPOCH_2015, FixedTime(EPOCH_2015 + 10));
        let output = execute(
            &duid,
            Command::Inspect {
                id: "8388624385".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            output,
            Output::Inspect(Inspection {
                id: "8388624385".to_string(),
                timestamp: 1000,
                unix_millis: EPOCH_2015 + 1000,
                shard_id: 2,
                sequence: 1,
            })
        );
        assert_eq!(
            render(&output, true),
            format!(
                "{{\"id\":\"8388624385\",\"timestamp\":1000,\"unix_millis\":{},\"shard_id\":2,\"sequence\":1}}\n",
                EPOCH_2015 + 1000
            )
        );
        assert!(
            execute(
                &duid,
                Command::Inspect {
                    id: "not a number".to_string()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn tokens_have_requested_length() {
        let duid = ShortDuid::new(0, SALT, 0);
        let Output::Text(key) = execute(&duid, Command::ApiKey { len: 20 }).unwrap() else {
            panic!("expected text");
        };
        assert_eq!(key.len(), 20);
        let Output::Text(password) = execute(&duid, Command::Password { len: 5000 }).unwrap()
        else {
            panic!("expected text");
        };
        assert_eq!(password.len(), 16);
    }
}
