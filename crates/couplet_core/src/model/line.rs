//! Line domain model.
//!
//! # Responsibility
//! - Define the matcher input (`Line`) and the persisted record (`LineRecord`).
//!
//! # Invariants
//! - `external_id` is the stable identity of a post and is never reused.
//! - Timestamps are Unix epoch milliseconds.
//! - `submitted_at_ms` is set once the line itself has been amplified.
//! - `acted_upon_at_ms` is set once a line has been published in a couplet.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input unit for couplet matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub text: String,
    pub timestamp_ms: i64,
}

impl Line {
    pub fn new(id: impl Into<String>, text: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            timestamp_ms,
        }
    }
}

/// Persisted record of an accepted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Post key assigned by the network; unique in storage.
    pub external_id: String,
    /// Author identifier (DID on the source network).
    pub author_id: String,
    pub text: String,
    pub created_at_ms: i64,
    /// When this line was amplified, possibly before its partner was.
    pub submitted_at_ms: Option<i64>,
    /// When this line was published as part of a couplet.
    pub acted_upon_at_ms: Option<i64>,
}

/// Validation errors for [`LineRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineValidationError {
    EmptyExternalId,
    EmptyAuthorId,
    EmptyText,
    ActedUponBeforeCreation {
        created_at_ms: i64,
        acted_upon_at_ms: i64,
    },
}

impl Display for LineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyExternalId => write!(f, "external_id must not be empty"),
            Self::EmptyAuthorId => write!(f, "author_id must not be empty"),
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::ActedUponBeforeCreation {
                created_at_ms,
                acted_upon_at_ms,
            } => write!(
                f,
                "acted_upon_at_ms ({acted_upon_at_ms}) is earlier than created_at_ms ({created_at_ms})"
            ),
        }
    }
}

impl Error for LineValidationError {}

impl LineRecord {
    /// Creates a record that has not been acted upon.
    pub fn new(
        external_id: impl Into<String>,
        author_id: impl Into<String>,
        text: impl Into<String>,
        created_at_ms: i64,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            author_id: author_id.into(),
            text: text.into(),
            created_at_ms,
            submitted_at_ms: None,
            acted_upon_at_ms: None,
        }
    }

    pub fn validate(&self) -> Result<(), LineValidationError> {
        if self.external_id.trim().is_empty() {
            return Err(LineValidationError::EmptyExternalId);
        }
        if self.author_id.trim().is_empty() {
            return Err(LineValidationError::EmptyAuthorId);
        }
        if self.text.trim().is_empty() {
            return Err(LineValidationError::EmptyText);
        }
        if let Some(acted_upon_at_ms) = self.acted_upon_at_ms {
            if acted_upon_at_ms < self.created_at_ms {
                return Err(LineValidationError::ActedUponBeforeCreation {
                    created_at_ms: self.created_at_ms,
                    acted_upon_at_ms,
                });
            }
        }
        Ok(())
    }

    pub fn is_acted_upon(&self) -> bool {
        self.acted_upon_at_ms.is_some()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at_ms.is_some()
    }

    /// Projection used by the couplet matcher.
    pub fn to_line(&self) -> Line {
        Line::new(
            self.external_id.clone(),
            self.text.clone(),
            self.created_at_ms,
        )
    }
}
