//! Text normalization ahead of lexicon lookup.
//!
//! # Responsibility
//! - Turn raw post text into lookup tokens.
//! - Spell out numerals so they can be scanned like words.

pub mod normalize;
pub mod numbers;

pub use normalize::{normalize, numerals_to_words, Ineligible, NormalizedLine};
pub use numbers::num2words;
