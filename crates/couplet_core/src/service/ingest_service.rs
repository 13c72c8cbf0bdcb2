//! Stream ingest use-case.
//!
//! # Responsibility
//! - Filter stream messages down to new posts with text.
//! - Classify post text and store accepted lines.
//!
//! # Invariants
//! - Only accepted lines reach the repository.
//! - Re-delivered messages are absorbed as duplicates, never errors.
//! - Post text is never logged above debug level.

use crate::meter::{Classification, MeterClassifier, Rejection};
use crate::model::{LineRecord, MessageError, StreamMessage};
use crate::repo::{LineRepository, RepoError, RepoResult};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// What happened to one stream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Not a new post with text in the watched collection, or not a commit.
    Ignored,
    Rejected(Rejection),
    Stored,
    Duplicate,
}

/// Failure while ingesting one raw message.
#[derive(Debug)]
pub enum IngestError {
    Message(MessageError),
    Repo(RepoError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Message(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<MessageError> for IngestError {
    fn from(value: MessageError) -> Self {
        Self::Message(value)
    }
}

impl From<RepoError> for IngestError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Classifies incoming posts and stores the accepted ones.
pub struct IngestService<R: LineRepository> {
    repo: R,
    classifier: Arc<MeterClassifier>,
    post_collection: String,
}

impl<R: LineRepository> IngestService<R> {
    pub fn new(
        repo: R,
        classifier: Arc<MeterClassifier>,
        post_collection: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            classifier,
            post_collection: post_collection.into(),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Processes one decoded message.
    pub fn handle_message(&self, message: &StreamMessage) -> RepoResult<IngestOutcome> {
        if !message.is_classifiable(&self.post_collection) {
            return Ok(IngestOutcome::Ignored);
        }

        let pattern = match self.classifier.classify_text(&message.text) {
            Classification::Accepted { pattern } => pattern,
            Classification::Rejected(reason) => return Ok(IngestOutcome::Rejected(reason)),
        };

        let record = LineRecord::new(
            message.id.as_str(),
            message.author.as_str(),
            message.text.as_str(),
            message.created_at_ms,
        );
        if !self.repo.insert_line(&record)? {
            debug!(
                "event=line_store module=ingest status=duplicate external_id={}",
                record.external_id
            );
            return Ok(IngestOutcome::Duplicate);
        }

        info!(
            "event=line_store module=ingest status=ok external_id={} meter={} syllables={}",
            record.external_id,
            self.classifier.template().kind(),
            pattern.len()
        );
        debug!("event=line_store module=ingest text={:?}", record.text);
        Ok(IngestOutcome::Stored)
    }

    /// Decodes and processes one raw relay message.
    pub fn handle_raw(&self, raw: &str) -> Result<IngestOutcome, IngestError> {
        match StreamMessage::from_json(raw)? {
            Some(message) => Ok(self.handle_message(&message)?),
            None => Ok(IngestOutcome::Ignored),
        }
    }
}
