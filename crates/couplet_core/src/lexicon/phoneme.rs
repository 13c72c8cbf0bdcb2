//! Phoneme and pronunciation variant types.
//!
//! # Invariants
//! - A phoneme's `symbol` never carries the trailing stress digit.
//! - `Variant::stresses()` yields one digit per stress-bearing phoneme, in order.

use super::LexiconError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lexical stress level of a vowel phoneme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    /// Parses the trailing digit of a phoneme symbol.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Self::Unstressed),
            '1' => Some(Self::Primary),
            '2' => Some(Self::Secondary),
            _ => None,
        }
    }

    /// Numeric stress digit (`0|1|2`) used by meter templates.
    pub fn digit(self) -> u8 {
        match self {
            Self::Unstressed => 0,
            Self::Primary => 1,
            Self::Secondary => 2,
        }
    }
}

/// One pronunciation unit, optionally carrying a stress tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phoneme {
    pub symbol: String,
    pub stress: Option<Stress>,
}

impl Phoneme {
    /// Parses one ARPAbet-style token such as `AH0`, `EY1` or `T`.
    pub fn parse(raw: &str) -> Result<Self, LexiconError> {
        let raw = raw.trim();
        let Some(last) = raw.chars().last() else {
            return Err(LexiconError::InvalidPhoneme(raw.to_string()));
        };

        let (symbol, stress) = match Stress::from_digit(last) {
            Some(stress) => (&raw[..raw.len() - 1], Some(stress)),
            None => (raw, None),
        };

        if symbol.is_empty() || !symbol.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LexiconError::InvalidPhoneme(raw.to_string()));
        }

        Ok(Self {
            symbol: symbol.to_ascii_uppercase(),
            stress,
        })
    }

    pub fn is_stressed(&self) -> bool {
        self.stress.is_some()
    }
}

impl Display for Phoneme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.stress {
            Some(stress) => write!(f, "{}{}", self.symbol, stress.digit()),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// One accepted pronunciation of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    phonemes: Vec<Phoneme>,
}

impl Variant {
    pub fn new(phonemes: Vec<Phoneme>) -> Self {
        Self { phonemes }
    }

    /// Parses a whitespace-free list of phoneme tokens.
    pub fn parse<I, S>(tokens: I) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phonemes = tokens
            .into_iter()
            .map(|token| Phoneme::parse(token.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if phonemes.is_empty() {
            return Err(LexiconError::EmptyVariant);
        }
        Ok(Self { phonemes })
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    /// Stress digits of the stress-bearing phonemes, in order.
    pub fn stresses(&self) -> Vec<u8> {
        self.phonemes
            .iter()
            .filter_map(|phoneme| phoneme.stress.map(Stress::digit))
            .collect()
    }

    pub fn syllable_count(&self) -> usize {
        self.phonemes.iter().filter(|p| p.is_stressed()).count()
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, phoneme) in self.phonemes.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{phoneme}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Phoneme, Stress, Variant};

    #[test]
    fn parse_splits_stress_digit_from_symbol() {
        let vowel = Phoneme::parse("EY1").unwrap();
        assert_eq!(vowel.symbol, "EY");
        assert_eq!(vowel.stress, Some(Stress::Primary));

        let consonant = Phoneme::parse("t").unwrap();
        assert_eq!(consonant.symbol, "T");
        assert_eq!(consonant.stress, None);
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert!(Phoneme::parse("").is_err());
        assert!(Phoneme::parse("1").is_err());
        assert!(Phoneme::parse("A-H0").is_err());
    }

    #[test]
    fn variant_stresses_skip_consonants() {
        let variant = Variant::parse(["T", "AH0", "D", "EY1"]).unwrap();
        assert_eq!(variant.stresses(), vec![0, 1]);
        assert_eq!(variant.syllable_count(), 2);
        assert_eq!(variant.to_string(), "T AH0 D EY1");
    }
}
