//! Filter configuration.
//!
//! # Responsibility
//! - Hold every tunable of the classifier, matcher, ingest loop and publish
//!   cycle in one serde-loadable value.
//! - Reject configurations that would disable the search caps.
//!
//! # Invariants
//! - Missing fields take their documented defaults.
//! - `pairing_window_secs = null` means no window.
//! - The effective amplify delay is never below `MIN_AMPLIFY_DELAY`.

use crate::meter::classifier::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS};
use crate::meter::resolve::{DEFAULT_AMBIGUITY_BUDGET, DEFAULT_COMBINATION_CAP};
use crate::meter::{MeterKind, SearchLimits};
use crate::model::POST_COLLECTION;
use crate::rhyme::PairingWindow;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Floor for the pause between the two amplify submissions of a couplet.
pub const MIN_AMPLIFY_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_PAIRING_WINDOW_SECS: u64 = 24 * 60 * 60;
const DEFAULT_AMPLIFY_DELAY_MS: u64 = 5_000;
const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Tunables for one filter deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub meter: MeterKind,
    pub ambiguity_budget: usize,
    pub combination_cap: usize,
    /// Memo table size; 0 disables memoization.
    pub cache_capacity: usize,
    pub min_words: usize,
    pub max_words: usize,
    pub pairing_window_secs: Option<u64>,
    pub amplify_delay_ms: u64,
    pub reconnect_delay_ms: u64,
    pub post_collection: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            meter: MeterKind::default(),
            ambiguity_budget: DEFAULT_AMBIGUITY_BUDGET,
            combination_cap: DEFAULT_COMBINATION_CAP,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_words: DEFAULT_MIN_WORDS,
            max_words: DEFAULT_MAX_WORDS,
            pairing_window_secs: Some(DEFAULT_PAIRING_WINDOW_SECS),
            amplify_delay_ms: DEFAULT_AMPLIFY_DELAY_MS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            post_collection: POST_COLLECTION.to_string(),
        }
    }
}

impl FilterConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ambiguity_budget == 0 {
            return Err(invalid("ambiguity_budget", "must be at least 1"));
        }
        if self.combination_cap == 0 {
            return Err(invalid("combination_cap", "must be at least 1"));
        }
        if self.min_words == 0 {
            return Err(invalid("min_words", "must be at least 1"));
        }
        if self.min_words > self.max_words {
            return Err(invalid(
                "max_words",
                format!(
                    "must not be below min_words ({} > {})",
                    self.min_words, self.max_words
                ),
            ));
        }
        if self.post_collection.trim().is_empty() {
            return Err(invalid("post_collection", "must not be empty"));
        }
        Ok(())
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            ambiguity_budget: self.ambiguity_budget,
            combination_cap: self.combination_cap,
        }
    }

    pub fn pairing_window(&self) -> PairingWindow {
        match self.pairing_window_secs {
            Some(secs) => PairingWindow::within_secs(secs),
            None => PairingWindow::Unbounded,
        }
    }

    /// Configured amplify delay, raised to `MIN_AMPLIFY_DELAY` if lower.
    pub fn amplify_delay(&self) -> Duration {
        Duration::from_millis(self.amplify_delay_ms).max(MIN_AMPLIFY_DELAY)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FilterConfig, MIN_AMPLIFY_DELAY};
    use crate::meter::MeterKind;
    use crate::rhyme::PairingWindow;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = FilterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());
        assert_eq!(config.search_limits().ambiguity_budget, 3);
        assert_eq!(config.search_limits().combination_cap, 24);
        assert_eq!(config.pairing_window(), PairingWindow::within_secs(86_400));
    }

    #[test]
    fn null_window_is_unbounded() {
        let config = FilterConfig::from_json_str(
            r#"{"meter": "anapestic_trimeter", "pairing_window_secs": null}"#,
        )
        .unwrap();
        assert_eq!(config.meter, MeterKind::AnapesticTrimeter);
        assert_eq!(config.pairing_window(), PairingWindow::Unbounded);
    }

    #[test]
    fn amplify_delay_is_clamped_to_minimum() {
        let config = FilterConfig::from_json_str(r#"{"amplify_delay_ms": 10}"#).unwrap();
        assert_eq!(config.amplify_delay(), MIN_AMPLIFY_DELAY);

        let config = FilterConfig::from_json_str(r#"{"amplify_delay_ms": 7000}"#).unwrap();
        assert_eq!(config.amplify_delay(), Duration::from_secs(7));
    }

    #[test]
    fn validation_rejects_disabled_caps_and_inverted_bounds() {
        let err = FilterConfig::from_json_str(r#"{"combination_cap": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "combination_cap",
                ..
            }
        ));

        let err = FilterConfig::from_json_str(r#"{"ambiguity_budget": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "ambiguity_budget",
                ..
            }
        ));

        let err = FilterConfig::from_json_str(r#"{"min_words": 10, "max_words": 5}"#).unwrap_err();
        assert!(err.to_string().contains("max_words"));
    }

    #[test]
    fn unknown_meter_is_a_json_error() {
        let err = FilterConfig::from_json_str(r#"{"meter": "dactylic_hexameter"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(&path, r#"{"cache_capacity": 0}"#).unwrap();
        let config = FilterConfig::load(&path).unwrap();
        assert_eq!(config.cache_capacity, 0);
    }
}
