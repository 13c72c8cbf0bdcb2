//! Classification outcomes.
//!
//! Rejections are expected results of normal operation, never errors.

use crate::text::Ineligible;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Why a line is not eligible as a metrical line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Ineligible(Ineligible),
    /// No classifiable tokens after normalization.
    Empty,
    WordCount {
        count: usize,
        min: usize,
        max: usize,
    },
    /// Every token is the same word.
    Repetitive,
    UnknownWord(String),
    TooAmbiguous {
        ambiguous: usize,
        budget: usize,
    },
    LengthImpossible {
        min_syllables: usize,
        max_syllables: usize,
        target: usize,
    },
    SearchExhausted {
        evaluated: usize,
    },
    NoMatch,
}

impl Rejection {
    /// Stable snake_case code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ineligible(_) => "ineligible",
            Self::Empty => "empty",
            Self::WordCount { .. } => "word_count",
            Self::Repetitive => "repetitive",
            Self::UnknownWord(_) => "unknown_word",
            Self::TooAmbiguous { .. } => "too_ambiguous",
            Self::LengthImpossible { .. } => "length_impossible",
            Self::SearchExhausted { .. } => "search_exhausted",
            Self::NoMatch => "no_match",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ineligible(reason) => write!(f, "ineligible text: {reason}"),
            Self::Empty => write!(f, "no classifiable words"),
            Self::WordCount { count, min, max } => {
                write!(f, "word count {count} outside {min}..={max}")
            }
            Self::Repetitive => write!(f, "line repeats a single word"),
            Self::UnknownWord(word) => write!(f, "word not in lexicon: `{word}`"),
            Self::TooAmbiguous { ambiguous, budget } => write!(
                f,
                "{ambiguous} ambiguous words exceed the budget of {budget}"
            ),
            Self::LengthImpossible {
                min_syllables,
                max_syllables,
                target,
            } => write!(
                f,
                "syllable range {min_syllables}..={max_syllables} cannot reach {target}"
            ),
            Self::SearchExhausted { evaluated } => {
                write!(f, "search cap reached after {evaluated} combinations")
            }
            Self::NoMatch => write!(f, "no stress combination fits the meter"),
        }
    }
}

/// Result of classifying one line against a meter template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// `pattern` is the first stress sequence that satisfied the template.
    Accepted { pattern: Vec<u8> },
    Rejected(Rejection),
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

impl From<Rejection> for Classification {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}
