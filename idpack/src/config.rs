//! Codec configuration.
//!
//! A [`Config`] is an immutable value handed to an [`IdPacker`](crate::IdPacker).
//! Nothing in this crate keeps configuration in global state, so packers
//! built from different configs can be used side by side from any thread.

use std::num::NonZeroU16;

use crate::alphabet::Alphabet;
use crate::segmenter::DEFAULT_WINDOW_SIZE;

/// Settings shared by the encode and decode paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Threshold at which clusters of short runs are folded into a bitmap.
    /// Also the widest bitmap the encoder will build.
    pub window_size: NonZeroU16,
    /// Symbols used for the numeral after each segment prefix.
    pub alphabet: Alphabet,
    /// Whether map entries with a null value are left out when encoding.
    pub exclude_null: bool,
    /// Optional upper bound on the number of identifiers a decode may yield.
    ///
    /// Unset by default, so that everything the encoder emits decodes back.
    /// Services decoding untrusted text should set it: a token such as
    /// `~----------` names an astronomically long range in a handful of
    /// characters.
    pub value_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            alphabet: Alphabet::default(),
            exclude_null: true,
            value_limit: None,
        }
    }
}

impl Config {
    /// Returns the config with a different window size.
    pub fn with_window_size(mut self, window_size: NonZeroU16) -> Self {
        self.window_size = window_size;
        self
    }

    /// Returns the config with a different alphabet.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Returns the config with null-valued map entries kept or excluded.
    pub fn with_exclude_null(mut self, exclude_null: bool) -> Self {
        self.exclude_null = exclude_null;
        self
    }

    /// Returns the config with a different decode value limit.
    pub fn with_value_limit(mut self, value_limit: u64) -> Self {
        self.value_limit = Some(value_limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.window_size.get(), 10);
        assert_eq!(config.alphabet.base(), 63);
        assert!(config.exclude_null);
        assert_eq!(config.value_limit, None);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_window_size(NonZeroU16::new(3).unwrap())
            .with_alphabet(Alphabet::new("01").unwrap())
            .with_exclude_null(false)
            .with_value_limit(7);

        assert_eq!(config.window_size.get(), 3);
        assert_eq!(config.alphabet.to_string(), "01");
        assert!(!config.exclude_null);
        assert_eq!(config.value_limit, Some(7));
    }
}
