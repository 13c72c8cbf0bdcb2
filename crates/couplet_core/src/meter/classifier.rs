//! Meter classification of whole lines.
//!
//! # Responsibility
//! - Gate raw text (eligibility, word count, repetition) before lookup.
//! - Decide whether any resolved stress sequence satisfies the template.
//! - Memoize lexicon-dependent results by normalized text.
//!
//! # Invariants
//! - Classification is call-and-return with no side effects besides the memo
//!   table; retrying a call is always safe.
//! - Ambiguity and length rejections are final and evaluated before any
//!   template comparison.
//! - The classifier holds no mutable lexicon state and is `Send + Sync`.

use super::cache::LruCache;
use super::resolve::{SearchLimits, StressPatternResolver};
use super::template::MeterTemplate;
use super::verdict::{Classification, Rejection};
use crate::config::FilterConfig;
use crate::lexicon::Lexicon;
use crate::text::{normalize, NormalizedLine};
use log::debug;
use std::ops::RangeInclusive;
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
pub const DEFAULT_MIN_WORDS: usize = 5;
pub const DEFAULT_MAX_WORDS: usize = 75;

/// Normalized tokens together with their classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Empty when the text was ineligible before tokenization.
    pub line: NormalizedLine,
    pub classification: Classification,
}

/// Classifies lines against one meter template.
pub struct MeterClassifier {
    lexicon: Arc<Lexicon>,
    template: MeterTemplate,
    limits: SearchLimits,
    word_bounds: RangeInclusive<usize>,
    cache: LruCache<Classification>,
}

impl MeterClassifier {
    /// Creates a classifier with default limits, word bounds and cache size.
    pub fn new(lexicon: Arc<Lexicon>, template: MeterTemplate) -> Self {
        Self {
            lexicon,
            template,
            limits: SearchLimits::default(),
            word_bounds: DEFAULT_MIN_WORDS..=DEFAULT_MAX_WORDS,
            cache: LruCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Creates a classifier from validated filter configuration.
    pub fn from_config(lexicon: Arc<Lexicon>, config: &FilterConfig) -> Self {
        Self::new(lexicon, config.meter.template())
            .with_limits(config.search_limits())
            .with_word_bounds(config.min_words..=config.max_words)
            .with_cache_capacity(config.cache_capacity)
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_word_bounds(mut self, bounds: RangeInclusive<usize>) -> Self {
        self.word_bounds = bounds;
        self
    }

    /// Replaces the memo table; capacity 0 disables memoization.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = LruCache::new(capacity);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn template(&self) -> &MeterTemplate {
        &self.template
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Classifies already-normalized tokens.
    pub fn classify(&self, line: &NormalizedLine) -> Classification {
        if line.is_empty() {
            return Rejection::Empty.into();
        }

        let key = line.as_text();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let classification = self.search(line);
        self.cache.insert(key, classification.clone());
        classification
    }

    /// Normalizes, gates and classifies raw text.
    pub fn classify_text(&self, raw: &str) -> Classification {
        self.assess(raw).classification
    }

    /// Like [`Self::classify_text`], also returning the normalized tokens.
    pub fn assess(&self, raw: &str) -> Assessment {
        let line = match normalize(raw) {
            Ok(line) => line,
            Err(reason) => {
                return Assessment {
                    line: NormalizedLine::default(),
                    classification: Rejection::Ineligible(reason).into(),
                };
            }
        };

        let classification = match self.gate(raw, &line) {
            Some(rejection) => rejection.into(),
            None => self.classify(&line),
        };

        match &classification {
            Classification::Accepted { .. } => debug!(
                "event=classify module=meter status=accepted meter={} tokens={}",
                self.template.kind(),
                line.len()
            ),
            Classification::Rejected(reason) => debug!(
                "event=classify module=meter status=rejected meter={} reason={}",
                self.template.kind(),
                reason.code()
            ),
        }

        Assessment {
            line,
            classification,
        }
    }

    fn gate(&self, raw: &str, line: &NormalizedLine) -> Option<Rejection> {
        let count = raw.split_whitespace().count();
        if !self.word_bounds.contains(&count) {
            return Some(Rejection::WordCount {
                count,
                min: *self.word_bounds.start(),
                max: *self.word_bounds.end(),
            });
        }

        if line.is_empty() {
            return Some(Rejection::Empty);
        }
        let first = &line.tokens()[0];
        if line.tokens().iter().all(|token| token == first) {
            return Some(Rejection::Repetitive);
        }
        None
    }

    fn search(&self, line: &NormalizedLine) -> Classification {
        let resolver = StressPatternResolver::new(&self.lexicon, self.limits);
        let mut combinations = match resolver.combinations(line.tokens(), self.template.len()) {
            Ok(combinations) => combinations,
            Err(rejection) => return rejection.into(),
        };

        for pattern in combinations.by_ref() {
            if self.template.matches(&pattern) {
                return Classification::Accepted { pattern };
            }
        }

        if combinations.truncated() {
            Rejection::SearchExhausted {
                evaluated: combinations.evaluated(),
            }
            .into()
        } else {
            Rejection::NoMatch.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MeterClassifier;
    use crate::lexicon::Lexicon;
    use crate::meter::{Classification, MeterTemplate, Rejection, SearchLimits};
    use crate::text::NormalizedLine;
    use std::sync::Arc;

    fn lexicon() -> Arc<Lexicon> {
        Arc::new(
            Lexicon::from_pronunciations([
                ("a", &[&["AH0"][..]][..]),
                ("the", &[&["DH", "AH0"][..]][..]),
                ("cat", &[&["K", "AE1", "T"][..]][..]),
                ("sat", &[&["S", "AE1", "T"][..]][..]),
                ("upon", &[&["AH0", "P", "AA1", "N"][..]][..]),
                ("mat", &[&["M", "AE1", "T"][..]][..]),
                ("and", &[&["AH0", "N", "D"][..], &["AE1", "N", "D"][..]][..]),
                ("slept", &[&["S", "L", "EH1", "P", "T"][..]][..]),
            ])
            .unwrap(),
        )
    }

    fn line(tokens: &[&str]) -> NormalizedLine {
        NormalizedLine::new(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn accepts_line_with_exact_iambic_stress() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter());
        let verdict = classifier.classify(&line(&[
            "the", "cat", "upon", "the", "mat", "a", "cat", "the", "mat",
        ]));
        assert_eq!(
            verdict,
            Classification::Accepted {
                pattern: vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]
            }
        );
    }

    #[test]
    fn later_variant_can_satisfy_the_template() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter());
        let verdict = classifier.classify(&line(&[
            "a", "cat", "upon", "the", "mat", "the", "cat", "a", "and",
        ]));
        assert!(verdict.is_accepted());
    }

    #[test]
    fn syllable_count_out_of_reach_is_length_impossible() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter());
        let verdict = classifier.classify(&line(&[
            "the", "cat", "sat", "upon", "the", "mat", "and", "slept", "a", "cat",
        ]));
        assert_eq!(
            verdict,
            Classification::Rejected(Rejection::LengthImpossible {
                min_syllables: 11,
                max_syllables: 11,
                target: 10
            })
        );
    }

    #[test]
    fn empty_line_is_rejected() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter());
        assert_eq!(
            classifier.classify(&NormalizedLine::default()),
            Classification::Rejected(Rejection::Empty)
        );
    }

    #[test]
    fn search_cap_without_match_is_search_exhausted() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter())
            .with_limits(SearchLimits {
                ambiguity_budget: 3,
                combination_cap: 1,
            });
        // First combination picks the unstressed `and`, which breaks the meter.
        let verdict = classifier.classify(&line(&[
            "the", "cat", "upon", "the", "mat", "the", "and", "cat", "sat",
        ]));
        assert_eq!(
            verdict,
            Classification::Rejected(Rejection::SearchExhausted { evaluated: 1 })
        );
    }

    #[test]
    fn text_gates_run_before_lookup() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter());
        assert!(matches!(
            classifier.classify_text("the cat"),
            Classification::Rejected(Rejection::WordCount { count: 2, .. })
        ));
        assert_eq!(
            classifier.classify_text("cat cat cat cat cat"),
            Classification::Rejected(Rejection::Repetitive)
        );
        assert!(matches!(
            classifier.classify_text("the cat sat on #mat"),
            Classification::Rejected(Rejection::Ineligible(_))
        ));
    }

    #[test]
    fn results_are_memoized_by_normalized_text() {
        let classifier = MeterClassifier::new(lexicon(), MeterTemplate::iambic_pentameter())
            .with_cache_capacity(8);
        let first = classifier.classify_text("The cat upon the mat, a cat, the mat");
        let second = classifier.classify_text("the CAT upon the mat a cat the MAT!");
        assert_eq!(first, second);
        assert!(first.is_accepted());
        assert_eq!(classifier.cached_entries(), 1);
    }
}
