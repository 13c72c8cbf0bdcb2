//! Meter classification and rhyming-couplet matching for social posts.
//!
//! Lines are normalized, checked against a metrical template using a
//! pronunciation lexicon, stored when accepted, and paired into couplets by
//! their terminal rhyme.

pub mod config;
pub mod db;
pub mod lexicon;
pub mod logging;
pub mod meter;
pub mod model;
pub mod repo;
pub mod rhyme;
pub mod service;
pub mod text;

pub use config::{ConfigError, FilterConfig};
pub use lexicon::{Lexicon, LexiconError, Phoneme, Stress, Variant};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use meter::{Classification, MeterClassifier, MeterKind, MeterTemplate, Rejection};
pub use model::{Line, LineRecord, StreamMessage};
pub use repo::{LineRepository, RepoError, RepoResult, SqliteLineRepository};
pub use rhyme::{do_words_rhyme, find_couplets, oldest_recent, rhyme_key, Couplet, PairingWindow};
pub use text::{normalize, num2words, NormalizedLine};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
