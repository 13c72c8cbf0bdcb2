//! Meter classification engine.
//!
//! # Responsibility
//! - Resolve candidate stress sequences from the lexicon under fixed caps.
//! - Match them against fixed-length meter templates.
//! - Report rejections as values, never as errors.
//!
//! # Invariants
//! - Per-line work is bounded by the ambiguity budget and combination cap.
//! - Ambiguous or incomplete data fails closed to rejection.

pub mod cache;
pub mod classifier;
pub mod resolve;
pub mod template;
pub mod verdict;

pub use classifier::{Assessment, MeterClassifier};
pub use resolve::{SearchLimits, StressCombinations, StressPatternResolver};
pub use template::{matches_template, MeterKind, MeterTemplate, SlotRule};
pub use verdict::{Classification, Rejection};
