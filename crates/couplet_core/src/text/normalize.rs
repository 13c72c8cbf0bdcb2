//! Raw post text to lookup tokens.
//!
//! # Responsibility
//! - Reject structurally ineligible posts before any lexicon work.
//! - Produce lowercase alphabetic tokens (apostrophes kept) for lookup.
//!
//! # Invariants
//! - `normalize` is pure: equal input always yields equal output.
//! - Empty input yields an empty, valid line.

use super::numbers::num2words;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Symbols that mark a post as a link, mention, tag or price.
pub const DISALLOWED_SYMBOLS: &[char] = &['$', '#', '@', '/'];

/// Literal replacements, applied in order.
const SUBSTITUTIONS: &[(&str, &str)] = &[("&", " and "), ("w/", "with"), ("w/o", "without")];

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z\s']").expect("valid non-word regex"));

/// Why a text never reaches the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligible {
    DisallowedSymbol(char),
    LineBreak,
    /// A digit run too long to spell out.
    NumberOverflow(String),
}

impl Display for Ineligible {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DisallowedSymbol(symbol) => write!(f, "contains disallowed symbol `{symbol}`"),
            Self::LineBreak => write!(f, "contains a line break"),
            Self::NumberOverflow(digits) => write!(f, "number `{digits}` is too large"),
        }
    }
}

/// Ordered lowercase tokens of one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedLine {
    tokens: Vec<String>,
}

impl NormalizedLine {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn last_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined by single spaces; used as the classification cache key.
    pub fn as_text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Normalizes raw post text into lookup tokens.
pub fn normalize(raw: &str) -> Result<NormalizedLine, Ineligible> {
    if let Some(symbol) = raw.chars().find(|ch| DISALLOWED_SYMBOLS.contains(ch)) {
        return Err(Ineligible::DisallowedSymbol(symbol));
    }
    if raw.contains(['\n', '\r']) {
        return Err(Ineligible::LineBreak);
    }

    let mut text = raw.to_string();
    for (from, to) in SUBSTITUTIONS {
        text = text.replace(from, to);
    }

    let text = numerals_to_words(&text)?;
    let text = NON_WORD_RE.replace_all(&text, "").to_lowercase();
    let tokens = text.split_whitespace().map(str::to_string).collect();
    Ok(NormalizedLine { tokens })
}

/// Replaces every digit run with its spelled-out words, padded by spaces.
pub fn numerals_to_words(text: &str) -> Result<String, Ineligible> {
    let mut overflow = None;
    let expanded = DIGIT_RUN_RE.replace_all(text, |caps: &Captures<'_>| {
        let digits = &caps[0];
        match digits.parse::<u64>() {
            Ok(value) => format!(" {} ", num2words(value)),
            Err(_) => {
                overflow.get_or_insert_with(|| digits.to_string());
                String::new()
            }
        }
    });

    match overflow {
        Some(digits) => Err(Ineligible::NumberOverflow(digits)),
        None => Ok(expanded.into_owned()),
    }
}
