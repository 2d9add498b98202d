//! The id-set codec façade.
//!
//! [`IdPacker`] wires the pipeline together:
//!
//! ```text
//! ids -> extract_runs -> WindowSegmenter -> Segments -> Alphabet -> text
//! text -> Segments::decode -> Segments::values -> ids
//! ```
//!
//! Encoding misuse is reported to the caller. Decoding is fail-soft:
//! corrupted text degrades to "nothing cached" instead of an error.

use serde_json::Value;

use crate::codec::{Decodable, DecodeError, Encodable};
use crate::config::Config;
use crate::error::Error;
use crate::run::extract_runs;
use crate::segmenter::{Segmenter, WindowSegmenter};
use crate::segments::Segments;

/// Encodes identifier sets into compact strings and back.
#[derive(Debug, Clone, Default)]
pub struct IdPacker {
    config: Config,
}

impl IdPacker {
    /// Creates a packer using `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The packer's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encodes a set of identifiers. Order and duplicates are irrelevant;
    /// the empty set encodes as `""`.
    ///
    /// ```
    /// let packer = idpack::IdPacker::default();
    /// assert_eq!(packer.encode([5, 6, 21, 23, 25]), "_F~C_P.V");
    /// ```
    pub fn encode<I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = u64>,
    {
        let runs = extract_runs(ids);
        let segments = WindowSegmenter::new(self.config.window_size).package(&runs);
        segments.encode(&self.config.alphabet)
    }

    /// Encodes the keys of a mapping. When the config excludes nulls, keys
    /// whose value is `None` are left out.
    pub fn encode_map<I, V>(&self, entries: I) -> String
    where
        I: IntoIterator<Item = (u64, Option<V>)>,
    {
        let exclude_null = self.config.exclude_null;
        self.encode(
            entries
                .into_iter()
                .filter(|(_, value)| !exclude_null || value.is_some())
                .map(|(id, _)| id),
        )
    }

    /// Encodes identifiers given as JSON: either an array of identifiers or
    /// an object whose keys are identifiers. A falsy object value (`null`,
    /// `false`, `0` or `""`) counts as absent.
    ///
    /// ## Errors
    /// - Anything that is not a non-negative integer where an identifier is
    ///   expected, or a top-level value that is neither array nor object
    ///   (`InvalidInput`)
    pub fn encode_json(&self, input: &Value) -> Result<String, Error> {
        match input {
            Value::Array(items) => {
                let ids = items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .ok_or_else(|| Error::InvalidInput(format!("{item} is not an identifier")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.encode(ids))
            }
            Value::Object(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| -> Result<_, Error> {
                        Ok((parse_key(key)?, is_present(value).then_some(value)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.encode_map(entries))
            }
            other => Err(Error::InvalidInput(format!(
                "expected an array or object of identifiers, got {other}"
            ))),
        }
    }

    /// Decodes an id pack, returning the identifiers in ascending order.
    ///
    /// Never fails: corrupted input is logged and yields an empty list.
    pub fn decode(&self, encoded: &str) -> Vec<u64> {
        match self.try_decode(encoded) {
            Ok(ids) => ids,
            Err(error) => {
                tracing::debug!(%error, encoded, "discarding corrupted id pack");
                Vec::new()
            }
        }
    }

    /// Decodes an id pack, reporting why corrupted input was rejected.
    pub fn try_decode(&self, encoded: &str) -> Result<Vec<u64>, DecodeError> {
        let segments = Segments::decode(encoded, &self.config.alphabet)?;
        segments.values(self.config.value_limit)
    }

    /// Encodes a single integer with the configured alphabet.
    ///
    /// ## Errors
    /// - Negative values (`InvalidInput`)
    pub fn encode_integer<N>(&self, value: N) -> Result<String, Error>
    where
        N: TryInto<u64> + Copy + std::fmt::Display,
    {
        let value: u64 = value
            .try_into()
            .map_err(|_| Error::InvalidInput(format!("{value} is not a non-negative integer")))?;
        Ok(self.config.alphabet.encode(value))
    }

    /// Decodes a single integer written with the configured alphabet.
    pub fn decode_integer(&self, encoded: &str) -> Result<u64, Error> {
        Ok(self.config.alphabet.decode(encoded)?)
    }
}

/// Falsy JSON values mark an object entry as absent. Empty arrays and
/// objects are truthy.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Parses a JSON object key as an identifier. Only canonical decimal text
/// is accepted, so `"007"` or `"+7"` are rejected rather than folded into 7.
fn parse_key(key: &str) -> Result<u64, Error> {
    key.parse::<u64>()
        .ok()
        .filter(|id| id.to_string() == key)
        .ok_or_else(|| Error::InvalidInput(format!("{key:?} is not an identifier")))
}
