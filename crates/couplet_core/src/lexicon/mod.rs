//! Pronunciation lexicon.
//!
//! # Responsibility
//! - Map lowercase words to their ordered pronunciation variants.
//! - Derive per-word stress profiles for the meter resolver.
//!
//! # Invariants
//! - Keys are lowercase; lookups are case-insensitive.
//! - A lexicon is never mutated after construction; share it via `Arc`.
//! - Pronunciation overrides replace corpus entries for the same key.
//! - `stress_profile(w).len() == variants(w).len()` for every known word.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod load;
pub mod phoneme;

pub use phoneme::{Phoneme, Stress, Variant};

/// Domain-specific corrections seeded over the upstream corpus.
///
/// The corpus either lacks these words or carries readings that do not match
/// how they are said on the network the filter listens to.
pub const PRONUNCIATION_OVERRIDES: &[(&str, &[&str])] = &[
    ("bluesky", &["B", "L", "UW1", "S", "K", "AY2"]),
    ("repost", &["R", "IY0", "P", "OW1", "S", "T"]),
];

/// Stress digits per pronunciation variant of one word.
pub type StressProfile = Vec<Vec<u8>>;

/// Lexicon construction and loading errors.
#[derive(Debug)]
pub enum LexiconError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidPhoneme(String),
    EmptyVariant,
    InvalidLine { line: usize, message: String },
    Empty,
}

impl Display for LexiconError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid lexicon json: {err}"),
            Self::InvalidPhoneme(value) => write!(f, "invalid phoneme `{value}`"),
            Self::EmptyVariant => write!(f, "pronunciation variant has no phonemes"),
            Self::InvalidLine { line, message } => {
                write!(f, "invalid lexicon line {line}: {message}")
            }
            Self::Empty => write!(f, "lexicon contains no entries"),
        }
    }
}

impl Error for LexiconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LexiconError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LexiconError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Immutable word → pronunciation variants map.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Variant>>,
}

impl Lexicon {
    /// Builds a lexicon from `(word, variants)` pairs and applies overrides.
    ///
    /// Repeated words accumulate variants in input order; words with no
    /// variants are dropped.
    pub fn from_entries<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, Vec<Variant>)>,
        W: AsRef<str>,
    {
        let mut map: HashMap<String, Vec<Variant>> = HashMap::new();
        for (word, variants) in entries {
            if variants.is_empty() {
                continue;
            }
            map.entry(word.as_ref().trim().to_lowercase())
                .or_default()
                .extend(variants);
        }

        let mut lexicon = Self { entries: map };
        lexicon.apply_overrides();
        lexicon
    }

    /// Convenience constructor from raw phoneme strings, mainly for fixtures.
    pub fn from_pronunciations<'a, I>(entries: I) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a [&'a str]])>,
    {
        let mut parsed = Vec::new();
        for (word, variants) in entries {
            let variants = variants
                .iter()
                .map(|tokens| Variant::parse(tokens.iter()))
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push((word, variants));
        }
        Ok(Self::from_entries(parsed))
    }

    fn apply_overrides(&mut self) {
        for (word, tokens) in PRONUNCIATION_OVERRIDES {
            let phonemes = tokens
                .iter()
                .filter_map(|token| Phoneme::parse(token).ok())
                .collect();
            self.entries
                .insert((*word).to_string(), vec![Variant::new(phonemes)]);
        }
    }

    /// Returns all pronunciation variants for `word`, if known.
    pub fn variants(&self, word: &str) -> Option<&[Variant]> {
        self.entries
            .get(word.to_lowercase().as_str())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.variants(word).is_some()
    }

    /// Stress digits of each variant of `word`, in variant order.
    pub fn stress_profile(&self, word: &str) -> Option<StressProfile> {
        self.variants(word)
            .map(|variants| variants.iter().map(Variant::stresses).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexicon, Variant, PRONUNCIATION_OVERRIDES};

    fn variant(tokens: &[&str]) -> Variant {
        Variant::parse(tokens.iter()).unwrap()
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let lexicon = Lexicon::from_entries([("Cat", vec![variant(&["K", "AE1", "T"])])]);
        assert!(lexicon.contains("cat"));
        assert!(lexicon.contains("CAT"));
        assert!(!lexicon.contains("dog"));
    }

    #[test]
    fn repeated_words_accumulate_variants() {
        let lexicon = Lexicon::from_entries([
            ("read", vec![variant(&["R", "IY1", "D"])]),
            ("read", vec![variant(&["R", "EH1", "D"])]),
        ]);
        assert_eq!(lexicon.variants("read").unwrap().len(), 2);
    }

    #[test]
    fn stress_profile_has_one_row_per_variant() {
        let lexicon = Lexicon::from_entries([(
            "record",
            vec![
                variant(&["R", "EH1", "K", "ER0", "D"]),
                variant(&["R", "IH0", "K", "AO1", "R", "D"]),
            ],
        )]);
        let profile = lexicon.stress_profile("record").unwrap();
        assert_eq!(profile, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(profile.len(), lexicon.variants("record").unwrap().len());
    }

    #[test]
    fn overrides_replace_corpus_entries() {
        let lexicon = Lexicon::from_entries([
            ("bluesky", vec![variant(&["B", "L", "UW1"]), variant(&["S", "K", "AY1"])]),
            ("cat", vec![variant(&["K", "AE1", "T"])]),
        ]);

        let variants = lexicon.variants("bluesky").unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].to_string(), "B L UW1 S K AY2");

        for (word, _) in PRONUNCIATION_OVERRIDES {
            assert!(lexicon.contains(word), "override `{word}` missing");
        }
    }
}
