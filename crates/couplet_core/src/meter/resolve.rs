//! Stress pattern resolution over ambiguous pronunciations.
//!
//! # Responsibility
//! - Turn tokens into candidate whole-line stress sequences.
//! - Bound the cartesian product before and during enumeration.
//!
//! # Invariants
//! - Checks run in a fixed order: unknown word, ambiguity budget, syllable
//!   bounds, then enumeration. The first three never enumerate.
//! - Enumeration stops after `combination_cap` evaluated combinations.

use super::verdict::Rejection;
use crate::lexicon::{Lexicon, StressProfile};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AMBIGUITY_BUDGET: usize = 3;
pub const DEFAULT_COMBINATION_CAP: usize = 24;

/// Limits on the variant search for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Maximum number of tokens that may have more than one variant.
    pub ambiguity_budget: usize,
    /// Maximum number of variant combinations evaluated.
    pub combination_cap: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            ambiguity_budget: DEFAULT_AMBIGUITY_BUDGET,
            combination_cap: DEFAULT_COMBINATION_CAP,
        }
    }
}

/// Expands tokens into stress sequences using a lexicon.
pub struct StressPatternResolver<'lex> {
    lexicon: &'lex Lexicon,
    limits: SearchLimits,
}

impl<'lex> StressPatternResolver<'lex> {
    pub fn new(lexicon: &'lex Lexicon, limits: SearchLimits) -> Self {
        Self { lexicon, limits }
    }

    /// Validates the line and returns a lazy, capped combination iterator.
    pub fn combinations<S: AsRef<str>>(
        &self,
        tokens: &[S],
        target_len: usize,
    ) -> Result<StressCombinations, Rejection> {
        let mut profiles: Vec<StressProfile> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            match self.lexicon.stress_profile(token) {
                Some(profile) => profiles.push(profile),
                None => return Err(Rejection::UnknownWord(token.to_string())),
            }
        }

        let ambiguous = profiles.iter().filter(|profile| profile.len() > 1).count();
        if ambiguous > self.limits.ambiguity_budget {
            return Err(Rejection::TooAmbiguous {
                ambiguous,
                budget: self.limits.ambiguity_budget,
            });
        }

        let (min_syllables, max_syllables) = syllable_bounds(&profiles);
        if min_syllables > target_len || max_syllables < target_len {
            return Err(Rejection::LengthImpossible {
                min_syllables,
                max_syllables,
                target: target_len,
            });
        }

        Ok(StressCombinations::new(profiles, self.limits.combination_cap))
    }

    /// Collects every candidate stress sequence.
    ///
    /// Fails with `SearchExhausted` when the product is larger than the cap.
    pub fn resolve<S: AsRef<str>>(
        &self,
        tokens: &[S],
        target_len: usize,
    ) -> Result<Vec<Vec<u8>>, Rejection> {
        let mut combinations = self.combinations(tokens, target_len)?;
        let sequences: Vec<Vec<u8>> = combinations.by_ref().collect();
        if combinations.truncated() {
            return Err(Rejection::SearchExhausted {
                evaluated: combinations.evaluated(),
            });
        }
        Ok(sequences)
    }
}

fn syllable_bounds(profiles: &[StressProfile]) -> (usize, usize) {
    profiles.iter().fold((0, 0), |(min, max), profile| {
        let shortest = profile.iter().map(Vec::len).min().unwrap_or(0);
        let longest = profile.iter().map(Vec::len).max().unwrap_or(0);
        (min + shortest, max + longest)
    })
}

/// Odometer over per-token variant choices; the last token varies fastest.
#[derive(Debug, Clone)]
pub struct StressCombinations {
    profiles: Vec<StressProfile>,
    choice: Vec<usize>,
    total: usize,
    cap: usize,
    evaluated: usize,
    finished: bool,
}

impl StressCombinations {
    fn new(profiles: Vec<StressProfile>, cap: usize) -> Self {
        let total = profiles
            .iter()
            .fold(1usize, |acc, profile| acc.saturating_mul(profile.len()));
        let choice = vec![0; profiles.len()];
        Self {
            finished: total == 0,
            profiles,
            choice,
            total,
            cap,
            evaluated: 0,
        }
    }

    /// Size of the full cartesian product (saturating).
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// True once the cap stopped enumeration with combinations left over.
    pub fn truncated(&self) -> bool {
        self.evaluated >= self.cap && self.total > self.cap
    }

    fn advance(&mut self) {
        for idx in (0..self.choice.len()).rev() {
            self.choice[idx] += 1;
            if self.choice[idx] < self.profiles[idx].len() {
                return;
            }
            self.choice[idx] = 0;
        }
        self.finished = true;
    }
}

impl Iterator for StressCombinations {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.evaluated >= self.cap {
            return None;
        }

        let sequence = self
            .profiles
            .iter()
            .zip(&self.choice)
            .flat_map(|(profile, &choice)| profile[choice].iter().copied())
            .collect();
        self.evaluated += 1;
        self.advance();
        Some(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchLimits, StressPatternResolver};
    use crate::lexicon::Lexicon;
    use crate::meter::Rejection;

    fn lexicon() -> Lexicon {
        Lexicon::from_pronunciations([
            ("the", &[&["DH", "AH0"][..], &["DH", "IY0"][..]][..]),
            ("cat", &[&["K", "AE1", "T"][..]][..]),
            ("record", &[&["R", "EH1", "K", "ER0", "D"][..], &["R", "IH0", "K", "AO1", "R", "D"][..]][..]),
            ("our", &[&["AW1", "ER0"][..], &["AW1", "R"][..], &["AA1", "R"][..]][..]),
            ("fire", &[&["F", "AY1", "ER0"][..], &["F", "AY1", "R"][..]][..]),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_word_rejects_before_anything_else() {
        let lexicon = lexicon();
        let resolver = StressPatternResolver::new(&lexicon, SearchLimits::default());
        let err = resolver.resolve(&["the", "dog"], 2).unwrap_err();
        assert_eq!(err, Rejection::UnknownWord("dog".to_string()));
    }

    #[test]
    fn combinations_concatenate_in_token_order() {
        let lexicon = lexicon();
        let resolver = StressPatternResolver::new(&lexicon, SearchLimits::default());
        let sequences = resolver.resolve(&["cat", "record"], 3).unwrap();
        assert_eq!(sequences, vec![vec![1, 1, 0], vec![1, 0, 1]]);
    }

    #[test]
    fn ambiguity_budget_is_checked_before_length() {
        let lexicon = lexicon();
        let resolver = StressPatternResolver::new(&lexicon, SearchLimits::default());
        let err = resolver
            .resolve(&["the", "record", "our", "fire"], 100)
            .unwrap_err();
        assert_eq!(
            err,
            Rejection::TooAmbiguous {
                ambiguous: 4,
                budget: 3
            }
        );
    }

    #[test]
    fn impossible_length_is_rejected_without_enumeration() {
        let lexicon = lexicon();
        let resolver = StressPatternResolver::new(&lexicon, SearchLimits::default());
        let err = resolver.resolve(&["cat", "record"], 10).unwrap_err();
        assert_eq!(
            err,
            Rejection::LengthImpossible {
                min_syllables: 3,
                max_syllables: 3,
                target: 10
            }
        );

        let err = resolver.resolve(&["our", "fire"], 1).unwrap_err();
        assert!(matches!(err, Rejection::LengthImpossible { min_syllables: 2, max_syllables: 4, .. }));
    }

    #[test]
    fn cap_reached_before_exhaustion_is_search_exhausted() {
        let lexicon = lexicon();
        let limits = SearchLimits {
            ambiguity_budget: 3,
            combination_cap: 4,
        };
        let resolver = StressPatternResolver::new(&lexicon, limits);
        // 2 * 3 * 2 = 12 combinations, cap 4.
        let err = resolver.resolve(&["the", "our", "fire"], 4).unwrap_err();
        assert_eq!(err, Rejection::SearchExhausted { evaluated: 4 });
    }

    #[test]
    fn product_equal_to_cap_is_not_truncated() {
        let lexicon = lexicon();
        let limits = SearchLimits {
            ambiguity_budget: 3,
            combination_cap: 6,
        };
        let resolver = StressPatternResolver::new(&lexicon, limits);
        let sequences = resolver.resolve(&["our", "fire"], 3).unwrap();
        assert_eq!(sequences.len(), 6);
    }
}
