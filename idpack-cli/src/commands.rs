//! The subcommands of the idpack command line tool. Every command reads a
//! single input document and renders a single output line.

use std::collections::BTreeMap;
use std::num::NonZeroU16;

use anyhow::Context as _;
use clap::Args;
use clap::Subcommand;
use idpack::sync::SyncCodec;
use idpack::sync::SyncId;
use idpack::Alphabet;
use idpack::IdPacker;
use serde_json::Value;

/// The available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encode a JSON array of identifiers, or the keys of a JSON object,
    /// into an id pack.
    Encode {
        /// The JSON input. Read from stdin when omitted.
        input: Option<String>,
    },
    /// Decode an id pack into a JSON array of identifiers.
    Decode {
        /// The id pack. Read from stdin when omitted.
        input: Option<String>,
    },
    /// Encode a JSON object mapping identifiers to timestamps into a sync
    /// string.
    EncodeSync {
        /// The JSON input. Read from stdin when omitted.
        input: Option<String>,
    },
    /// Decode a sync string into a JSON object mapping identifiers to
    /// timestamps.
    DecodeSync {
        /// The sync string. Read from stdin when omitted.
        input: Option<String>,
        /// Added to every decoded timestamp.
        #[clap(short = 'b', long, default_value_t = 0, allow_negative_numbers = true)]
        base_timestamp: i64,
    },
}

impl Command {
    /// The input given on the command line, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            Command::Encode { input }
            | Command::Decode { input }
            | Command::EncodeSync { input }
            | Command::DecodeSync { input, .. } => input.as_deref(),
        }
    }

    /// The subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Encode { .. } => "encode",
            Command::Decode { .. } => "decode",
            Command::EncodeSync { .. } => "encode-sync",
            Command::DecodeSync { .. } => "decode-sync",
        }
    }
}

/// Command line overrides for the codec settings.
#[derive(Debug, Clone, Default, Args)]
pub struct CodecOverrides {
    /// Threshold at which clusters of short runs are folded into a bitmap,
    /// between 1 and 65535.
    #[clap(long, global = true)]
    pub window_size: Option<NonZeroU16>,

    /// Symbols used for the numerals of an id pack.
    #[clap(long, global = true)]
    pub alphabet: Option<Alphabet>,

    /// Keep object entries with a falsy value (null, false, 0 or "") when
    /// encoding.
    #[clap(long, global = true)]
    pub include_null: bool,
}

impl CodecOverrides {
    /// Applies the overrides on top of `config`.
    pub fn apply(&self, mut config: idpack::Config) -> idpack::Config {
        if let Some(window_size) = self.window_size {
            config = config.with_window_size(window_size);
        }
        if let Some(alphabet) = &self.alphabet {
            config = config.with_alphabet(alphabet.clone());
        }
        if self.include_null {
            config = config.with_exclude_null(false);
        }
        config
    }
}

/// Runs `command` over `input` and returns the text to print.
///
/// Decoding commands never fail on corrupted input, mirroring the library:
/// they print an empty result instead.
#[tracing::instrument(skip_all, fields(command = command.name()))]
pub fn run(command: &Command, packer: &IdPacker, input: &str) -> anyhow::Result<String> {
    let input = input.trim();

    match command {
        Command::Encode { .. } => {
            let value: Value = serde_json::from_str(input).context("input is not valid JSON")?;
            Ok(packer.encode_json(&value)?)
        }
        Command::Decode { .. } => {
            let ids = packer.decode(input);
            tracing::debug!(ids = ids.len(), "decoded id pack");
            Ok(serde_json::to_string(&ids)?)
        }
        Command::EncodeSync { .. } => {
            let synced_at = parse_synced_at(input)?;
            Ok(SyncCodec::new().encode(&synced_at))
        }
        Command::DecodeSync { base_timestamp, .. } => {
            let synced_at = SyncCodec::new().decode(input, *base_timestamp);
            tracing::debug!(ids = synced_at.len(), "decoded sync string");
            let rendered: serde_json::Map<String, Value> = synced_at
                .into_iter()
                .map(|(id, timestamp)| (id.to_string(), Value::from(timestamp)))
                .collect();
            Ok(serde_json::to_string(&rendered)?)
        }
    }
}

/// Parses a JSON object of `{id: timestamp}` pairs.
fn parse_synced_at(input: &str) -> anyhow::Result<BTreeMap<SyncId, i64>> {
    let entries: BTreeMap<String, i64> = serde_json::from_str(input)
        .context("input must be a JSON object mapping identifiers to integer timestamps")?;

    entries
        .into_iter()
        .map(|(id, timestamp)| -> anyhow::Result<_> { Ok((id.parse::<SyncId>()?, timestamp)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn encode() -> Command {
        Command::Encode { input: None }
    }

    fn decode() -> Command {
        Command::Decode { input: None }
    }

    fn decode_sync(base_timestamp: i64) -> Command {
        Command::DecodeSync { input: None, base_timestamp }
    }

    #[test_case("[5, 6, 21, 23, 25]", "_F~C_P.V"; "array")]
    #[test_case(r#"{"5": 1, "6": 1, "7": null, "21": 1, "23": 1, "25": 1}"#, "_F~C_P.V"; "object")]
    #[test_case(r#"{"5": 0, "6": "", "7": 1}"#, "_H~B"; "falsy values are absent")]
    #[test_case("[]\n", ""; "empty array")]
    fn encode_command(input: &str, expected: &str) {
        let output = run(&encode(), &IdPacker::default(), input).unwrap();
        assert_eq!(output, expected);
    }

    #[test_case("[1, -2]"; "negative id")]
    #[test_case("not json"; "invalid json")]
    fn encode_command_rejects_bad_input(input: &str) {
        assert!(run(&encode(), &IdPacker::default(), input).is_err());
    }

    #[test_case("_F~C_P.V\n", "[5,6,21,23,25]"; "id pack")]
    #[test_case("@@@invalid@@@", "[]"; "corrupted")]
    fn decode_command(input: &str, expected: &str) {
        let output = run(&decode(), &IdPacker::default(), input).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn sync_commands_roundtrip() {
        let packer = IdPacker::default();
        let input = r#"{"1": 1000, "2": 1000, "6f9619ff-8b86-d011-b42d-00c04fc964ff": 400}"#;

        let sync_str = run(&Command::EncodeSync { input: None }, &packer, input).unwrap();
        let output = run(&decode_sync(0), &packer, &sync_str).unwrap();
        let decoded: Value = serde_json::from_str(&output).unwrap();
        let expected: Value = serde_json::from_str(input).unwrap();
        assert_eq!(decoded, expected);

        let shifted = run(&decode_sync(-400), &packer, &sync_str).unwrap();
        let shifted: BTreeMap<String, i64> = serde_json::from_str(&shifted).unwrap();
        assert_eq!(shifted["1"], 600);
        assert_eq!(shifted["6f9619ff-8b86-d011-b42d-00c04fc964ff"], 0);
    }

    #[test]
    fn encode_sync_rejects_bad_identifiers() {
        let command = Command::EncodeSync { input: None };
        assert!(run(&command, &IdPacker::default(), r#"{"abc": 1}"#).is_err());
        assert!(run(&command, &IdPacker::default(), r#"{"1": "soon"}"#).is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let overrides = CodecOverrides {
            window_size: NonZeroU16::new(3),
            alphabet: Some("01".parse().unwrap()),
            include_null: true,
        };
        let config = overrides.apply(idpack::Config::default());

        assert_eq!(config.window_size.get(), 3);
        assert_eq!(config.alphabet.to_string(), "01");
        assert!(!config.exclude_null);

        let untouched = CodecOverrides::default().apply(idpack::Config::default());
        assert_eq!(untouched, idpack::Config::default());
    }
}
