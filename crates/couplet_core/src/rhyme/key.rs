//! Terminal rhyme keys.
//!
//! # Invariants
//! - Words with more than one pronunciation are `Undecidable`, even when all
//!   variants end the same way. Ambiguity is never resolved by picking one.
//! - A word never rhymes with itself.

use crate::lexicon::{Lexicon, Phoneme, Variant};
use std::fmt::{Display, Formatter};

/// Phoneme tail from the last stress-tagged phoneme to the end of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RhymeKey(Vec<Phoneme>);

impl RhymeKey {
    /// Extracts the key of one pronunciation variant.
    ///
    /// A variant without any stress tag yields the whole variant.
    pub fn of_variant(variant: &Variant) -> Self {
        let phonemes = variant.phonemes();
        let start = phonemes
            .iter()
            .rposition(Phoneme::is_stressed)
            .unwrap_or(0);
        Self(phonemes[start..].to_vec())
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.0
    }
}

impl Display for RhymeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, phoneme) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{phoneme}")?;
        }
        Ok(())
    }
}

/// Outcome of a rhyme key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RhymeLookup {
    Decidable(RhymeKey),
    /// The word has several pronunciations.
    Undecidable,
    NotFound,
}

impl RhymeLookup {
    pub fn key(&self) -> Option<&RhymeKey> {
        match self {
            Self::Decidable(key) => Some(key),
            _ => None,
        }
    }

    pub fn into_key(self) -> Option<RhymeKey> {
        match self {
            Self::Decidable(key) => Some(key),
            _ => None,
        }
    }
}

/// Looks up the rhyme key of `word`.
pub fn rhyme_key(lexicon: &Lexicon, word: &str) -> RhymeLookup {
    match lexicon.variants(word) {
        None => RhymeLookup::NotFound,
        Some([variant]) => RhymeLookup::Decidable(RhymeKey::of_variant(variant)),
        Some(_) => RhymeLookup::Undecidable,
    }
}

/// True iff the words differ and share one decidable rhyme key.
pub fn do_words_rhyme(lexicon: &Lexicon, a: &str, b: &str) -> bool {
    if a.to_lowercase() == b.to_lowercase() {
        return false;
    }
    match (rhyme_key(lexicon, a), rhyme_key(lexicon, b)) {
        (RhymeLookup::Decidable(left), RhymeLookup::Decidable(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{do_words_rhyme, rhyme_key, RhymeLookup};
    use crate::lexicon::Lexicon;

    fn lexicon() -> Lexicon {
        Lexicon::from_pronunciations([
            ("today", &[&["T", "AH0", "D", "EY1"][..]][..]),
            ("gray", &[&["G", "R", "EY1"][..]][..]),
            ("mat", &[&["M", "AE1", "T"][..]][..]),
            ("hmm", &[&["HH", "M"][..]][..]),
            ("either", &[&["IY1", "DH", "ER0"][..], &["AY1", "DH", "ER0"][..]][..]),
            ("neither", &[&["N", "IY1", "DH", "ER0"][..]][..]),
        ])
        .unwrap()
    }

    #[test]
    fn key_starts_at_last_stress_tagged_phoneme() {
        let lexicon = lexicon();
        let key = rhyme_key(&lexicon, "today").into_key().unwrap();
        assert_eq!(key.to_string(), "EY1");

        // Unstressed vowels carry a stress tag too.
        let key = rhyme_key(&lexicon, "neither").into_key().unwrap();
        assert_eq!(key.to_string(), "ER0");
    }

    #[test]
    fn unstressed_word_key_is_whole_variant() {
        let lexicon = lexicon();
        let key = rhyme_key(&lexicon, "hmm").into_key().unwrap();
        assert_eq!(key.to_string(), "HH M");
    }

    #[test]
    fn multi_variant_words_are_undecidable() {
        let lexicon = lexicon();
        assert_eq!(rhyme_key(&lexicon, "either"), RhymeLookup::Undecidable);
        assert_eq!(rhyme_key(&lexicon, "zebra"), RhymeLookup::NotFound);
    }

    #[test]
    fn rhyme_is_symmetric_and_never_reflexive() {
        let lexicon = lexicon();
        assert!(do_words_rhyme(&lexicon, "today", "gray"));
        assert!(do_words_rhyme(&lexicon, "gray", "today"));
        assert!(!do_words_rhyme(&lexicon, "today", "mat"));
        assert!(!do_words_rhyme(&lexicon, "gray", "GRAY"));
        assert!(!do_words_rhyme(&lexicon, "either", "neither"));
        assert!(!do_words_rhyme(&lexicon, "neither", "either"));
        assert!(!do_words_rhyme(&lexicon, "zebra", "gray"));
    }
}
