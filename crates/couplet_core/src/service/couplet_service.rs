//! Couplet publish cycle.
//!
//! # Responsibility
//! - Load lines stored since the last published couplet and match them.
//! - Submit the chosen couplet's lines to a publisher and mark them.
//!
//! # Invariants
//! - Lines are submitted earlier line first, with the amplify delay between.
//! - The amplify delay is never below `MIN_AMPLIFY_DELAY`.
//! - Lines are marked acted upon only after both submissions succeed.
//! - A line is amplified at most once; a retry after a partial failure
//!   resumes with the line that was not yet submitted.

use super::pause::Pause;
use crate::config::MIN_AMPLIFY_DELAY;
use crate::meter::MeterClassifier;
use crate::model::{Line, LineRecord};
use crate::repo::{LineRepository, RepoError, RepoResult};
use crate::rhyme::{oldest_recent, Couplet, CoupletMatcher, PairingWindow};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Failure reported by a [`Publisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishError {
    message: String,
}

impl PublishError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "publish failed: {}", self.message)
    }
}

impl Error for PublishError {}

/// Outbound amplify action (a repost on the source network).
pub trait Publisher {
    fn amplify(&self, line: &LineRecord) -> Result<(), PublishError>;
}

/// Error from one publish cycle.
#[derive(Debug)]
pub enum CycleError {
    Repo(RepoError),
    Publish {
        external_id: String,
        source: PublishError,
    },
}

impl Display for CycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Publish {
                external_id,
                source,
            } => write!(f, "{source} (line {external_id})"),
        }
    }
}

impl Error for CycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Publish { source, .. } => Some(source),
        }
    }
}

impl From<RepoError> for CycleError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Couplet published by one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedCouplet {
    pub couplet: Couplet,
    /// Earlier line first.
    pub lines: [LineRecord; 2],
    pub acted_upon_at_ms: i64,
}

/// Matches stored lines into couplets and publishes them.
pub struct CoupletService<R: LineRepository, P: Publisher> {
    repo: R,
    publisher: P,
    classifier: Arc<MeterClassifier>,
    window: PairingWindow,
    amplify_delay: Duration,
}

impl<R: LineRepository, P: Publisher> CoupletService<R, P> {
    pub fn new(
        repo: R,
        publisher: P,
        classifier: Arc<MeterClassifier>,
        window: PairingWindow,
        amplify_delay: Duration,
    ) -> Self {
        Self {
            repo,
            publisher,
            classifier,
            window,
            amplify_delay: amplify_delay.max(MIN_AMPLIFY_DELAY),
        }
    }

    pub fn amplify_delay(&self) -> Duration {
        self.amplify_delay
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Couplets among lines created after the newest published line.
    pub fn pending_couplets(&self) -> RepoResult<Vec<Couplet>> {
        let since = self.repo.latest_acted_upon_created_at()?;
        let lines: Vec<Line> = self
            .repo
            .list_lines_since(since)?
            .iter()
            .map(LineRecord::to_line)
            .collect();

        let couplets = CoupletMatcher::new(&self.classifier, self.window).find_couplets(&lines);
        info!(
            "event=couplet_scan module=couplet_service status=ok since_ms={} lines={} couplets={}",
            since.map_or_else(|| "none".to_string(), |value| value.to_string()),
            lines.len(),
            couplets.len()
        );
        Ok(couplets)
    }

    /// Runs one cycle; `Ok(None)` when no couplet is pending.
    pub fn publish_next<Z: Pause>(
        &self,
        now_ms: i64,
        pause: &Z,
    ) -> Result<Option<PublishedCouplet>, CycleError> {
        let couplets = self.pending_couplets()?;
        let Some(couplet) = oldest_recent(&couplets) else {
            return Ok(None);
        };

        let first = self.load(&couplet.first.id)?;
        let second = self.load(&couplet.second.id)?;

        let submitted_first = self.submit(&first, now_ms)?;
        if submitted_first && !second.is_submitted() {
            pause.pause(self.amplify_delay);
        }
        self.submit(&second, now_ms)?;

        // Clock skew must not produce a mark older than the line itself.
        let acted_upon_at_ms = now_ms.max(couplet.later_ms());
        self.repo.mark_acted_upon(
            &[first.external_id.as_str(), second.external_id.as_str()],
            acted_upon_at_ms,
        )?;
        info!(
            "event=couplet_publish module=couplet_service status=ok first={} second={} key={:?}",
            first.external_id,
            second.external_id,
            couplet.key.to_string()
        );

        Ok(Some(PublishedCouplet {
            couplet: couplet.clone(),
            lines: [first, second],
            acted_upon_at_ms,
        }))
    }

    fn load(&self, external_id: &str) -> Result<LineRecord, CycleError> {
        self.repo
            .get_line(external_id)?
            .ok_or_else(|| CycleError::Repo(RepoError::NotFound(external_id.to_string())))
    }

    /// Amplifies `line` unless an earlier cycle already did; returns whether
    /// an amplify call was made.
    fn submit(&self, line: &LineRecord, now_ms: i64) -> Result<bool, CycleError> {
        if line.is_submitted() {
            info!(
                "event=amplify module=couplet_service status=skipped external_id={} reason=already_submitted",
                line.external_id
            );
            return Ok(false);
        }

        self.publisher.amplify(line).map_err(|source| {
            error!(
                "event=amplify module=couplet_service status=error external_id={} error={}",
                line.external_id, source
            );
            CycleError::Publish {
                external_id: line.external_id.clone(),
                source,
            }
        })?;
        self.repo.mark_submitted(&line.external_id, now_ms)?;
        Ok(true)
    }
}
