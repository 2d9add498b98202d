//! # Base-K Integer Encoding
//!
//! This module renders non-negative integers as positional numerals over a
//! caller-supplied, ordered symbol alphabet. With the default 63-symbol
//! alphabet the first symbol `A` is the digit zero, so `5` encodes as `F`,
//! `63` as `BA`, and `"ABC"` decodes to `65`.
//!
//! ## Encoding Format
//!
//! - Most significant symbol first
//! - Zero is the single symbol `alphabet[0]`, never the empty string
//! - No padding with leading zero symbols
//!
//! Decoding is the single validation point for encoded id packs: any
//! character that is not part of the alphabet is rejected with
//! [`Error::InvalidSymbol`].

use std::collections::HashMap;

use crate::magnitude::Magnitude;
use crate::segment::{BITMAP_PREFIX, RANGE_PREFIX, SPACES_PREFIX};

/// Default symbol set: upper-case letters, lower-case letters, digits and `-`.
pub const DEFAULT_SYMBOLS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-";

/// Minimum number of symbols a positional alphabet needs.
const MIN_SYMBOLS: usize = 2;

/// Errors that can occur when building or using an alphabet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A character outside the alphabet was encountered while decoding.
    #[error("symbol {0:?} is not part of the alphabet")]
    InvalidSymbol(char),

    /// The alphabet has fewer than two symbols.
    #[error("an alphabet needs at least two symbols, got {0}")]
    TooFewSymbols(usize),

    /// The alphabet lists the same symbol twice.
    #[error("symbol {0:?} appears more than once in the alphabet")]
    DuplicateSymbol(char),

    /// The alphabet contains one of the segment prefix characters.
    #[error("symbol {0:?} is reserved as a segment prefix")]
    ReservedSymbol(char),

    /// The decoded value does not fit into a `u64`.
    #[error("encoded value {0:?} exceeds {} bits", u64::BITS)]
    ValueOutOfBounds(String),
}

/// An ordered set of unique symbols used as positional digits.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
    digits: HashMap<char, u32>,
}

impl Alphabet {
    /// Creates an alphabet from the symbols of `symbols`, in order.
    ///
    /// ## Errors
    /// - Fewer than two symbols (`TooFewSymbols`)
    /// - A repeated symbol (`DuplicateSymbol`)
    /// - A segment prefix among the symbols (`ReservedSymbol`)
    pub fn new(symbols: &str) -> Result<Self, Error> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < MIN_SYMBOLS {
            return Err(Error::TooFewSymbols(symbols.len()));
        }

        let mut digits = HashMap::with_capacity(symbols.len());
        for (digit, &symbol) in symbols.iter().enumerate() {
            if [SPACES_PREFIX, RANGE_PREFIX, BITMAP_PREFIX].contains(&symbol) {
                return Err(Error::ReservedSymbol(symbol));
            }
            // Even the full Unicode range fits comfortably in a u32.
            if digits.insert(symbol, digit as u32).is_some() {
                return Err(Error::DuplicateSymbol(symbol));
            }
        }

        Ok(Self { symbols, digits })
    }

    /// The numeric base, i.e. the number of symbols.
    pub fn base(&self) -> u32 {
        self.symbols.len() as u32
    }

    /// The symbols in digit order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Returns `true` if `symbol` is one of the alphabet's digits.
    pub fn contains(&self, symbol: char) -> bool {
        self.digits.contains_key(&symbol)
    }

    /// Returns the digit value of `symbol`.
    pub fn digit(&self, symbol: char) -> Result<u32, Error> {
        self.digits
            .get(&symbol)
            .copied()
            .ok_or(Error::InvalidSymbol(symbol))
    }

    /// Encodes `value` as a base-K numeral.
    pub fn encode(&self, value: u64) -> String {
        let base = u64::from(self.base());
        let mut digits = Vec::new();
        let mut quotient = value;

        loop {
            digits.push(self.symbols[(quotient % base) as usize]);
            quotient /= base;
            if quotient == 0 {
                break;
            }
        }

        digits.iter().rev().collect()
    }

    /// Decodes a base-K numeral into a `u64`.
    ///
    /// The empty string decodes to zero.
    ///
    /// ## Errors
    /// - A character outside the alphabet (`InvalidSymbol`)
    /// - A value wider than 64 bits (`ValueOutOfBounds`)
    pub fn decode(&self, encoded: &str) -> Result<u64, Error> {
        let base = u64::from(self.base());
        encoded.chars().try_fold(0u64, |value, symbol| {
            let digit = self.digit(symbol)?;
            value
                .checked_mul(base)
                .and_then(|shifted| shifted.checked_add(u64::from(digit)))
                .ok_or_else(|| Error::ValueOutOfBounds(encoded.to_string()))
        })
    }

    /// Encodes an arbitrary-width magnitude as a base-K numeral.
    pub fn encode_magnitude(&self, value: &Magnitude) -> String {
        let mut quotient = value.clone();
        let mut digits = Vec::new();

        loop {
            let remainder = quotient.div_rem(self.base());
            digits.push(self.symbols[remainder as usize]);
            if quotient.is_zero() {
                break;
            }
        }

        digits.iter().rev().collect()
    }

    /// Decodes a base-K numeral of any length into a magnitude.
    pub fn decode_magnitude(&self, encoded: &str) -> Result<Magnitude, Error> {
        let mut value = Magnitude::zero();
        for symbol in encoded.chars() {
            value.mul_add(self.base(), self.digit(symbol)?);
        }
        Ok(value)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = DEFAULT_SYMBOLS.chars().collect();
        let digits = symbols
            .iter()
            .enumerate()
            .map(|(digit, &symbol)| (symbol, digit as u32))
            .collect();
        Self { symbols, digits }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = Error;

    fn from_str(symbols: &str) -> Result<Self, Self::Err> {
        Self::new(symbols)
    }
}

impl TryFrom<String> for Alphabet {
    type Error = Error;

    fn try_from(symbols: String) -> Result<Self, Self::Error> {
        Self::new(&symbols)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.to_string()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Alphabet({self})")
    }
}
