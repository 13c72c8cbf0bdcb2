//! Stream message model and relay envelope decoding.
//!
//! # Invariants
//! - Only `create` operations on the configured post collection with
//!   non-empty text are classifiable.
//! - Envelopes without a commit (identity or account events) decode to `None`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record collection of regular posts on the source network.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

/// Repository operation carried by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// One decoded commit from the ingestion stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMessage {
    /// Record key of the post.
    pub id: String,
    /// Author DID.
    pub author: String,
    /// Empty for deletes and non-text records.
    pub text: String,
    pub created_at_ms: i64,
    pub operation: Operation,
    pub collection: String,
}

/// Decode failure for a relay message.
#[derive(Debug)]
pub enum MessageError {
    Json(serde_json::Error),
}

impl Display for MessageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid stream message: {err}"),
        }
    }
}

impl Error for MessageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for MessageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    did: String,
    time_us: i64,
    #[serde(default)]
    commit: Option<RawCommit>,
}

#[derive(Deserialize)]
struct RawCommit {
    operation: Operation,
    collection: String,
    rkey: String,
    #[serde(default)]
    record: Option<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    text: Option<String>,
}

impl StreamMessage {
    /// Decodes one relay JSON envelope.
    pub fn from_json(raw: &str) -> Result<Option<Self>, MessageError> {
        let envelope: RawEnvelope = serde_json::from_str(raw)?;
        let Some(commit) = envelope.commit else {
            return Ok(None);
        };

        let text = commit
            .record
            .and_then(|record| record.text)
            .unwrap_or_default();
        Ok(Some(Self {
            id: commit.rkey,
            author: envelope.did,
            text,
            created_at_ms: envelope.time_us / 1_000,
            operation: commit.operation,
            collection: commit.collection,
        }))
    }

    /// Whether this message should be offered to the classifier.
    pub fn is_classifiable(&self, post_collection: &str) -> bool {
        self.operation == Operation::Create
            && self.collection == post_collection
            && !self.text.trim().is_empty()
    }
}
