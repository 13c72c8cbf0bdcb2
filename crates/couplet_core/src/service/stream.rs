//! Single-consumer ingest loop over a message source.
//!
//! # Responsibility
//! - Pull one message at a time and hand it to the ingest service.
//! - Reconnect after transport failures with a fixed delay.
//!
//! # Invariants
//! - Transport failures never end the loop; the delay does not grow.
//! - A message that fails to decode or store is logged and skipped.
//! - The loop ends only when the source reports the stream closed.

use super::ingest_service::{IngestOutcome, IngestService};
use super::pause::Pause;
use crate::repo::LineRepository;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Connection-level failure of a message source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream transport error: {}", self.message)
    }
}

impl Error for TransportError {}

/// Long-lived source of raw relay messages (e.g. a websocket).
pub trait MessageSource {
    /// (Re)establishes the connection.
    fn connect(&mut self) -> Result<(), TransportError>;
    /// Waits for the next message; `Ok(None)` means the stream was closed
    /// for shutdown.
    fn recv(&mut self) -> Result<Option<String>, TransportError>;
}

/// Counters for one consumer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub received: u64,
    pub stored: u64,
    pub duplicates: u64,
    pub rejected: u64,
    pub ignored: u64,
    pub failed: u64,
    pub reconnects: u64,
}

/// Drives an [`IngestService`] from a [`MessageSource`].
pub struct StreamConsumer<'svc, R: LineRepository> {
    ingest: &'svc IngestService<R>,
    reconnect_delay: Duration,
}

impl<'svc, R: LineRepository> StreamConsumer<'svc, R> {
    pub fn new(ingest: &'svc IngestService<R>, reconnect_delay: Duration) -> Self {
        Self {
            ingest,
            reconnect_delay,
        }
    }

    /// Runs until the source reports the stream closed.
    pub fn run<S: MessageSource, P: Pause>(&self, source: &mut S, pause: &P) -> ConsumerStats {
        let mut stats = ConsumerStats::default();

        loop {
            if let Err(err) = source.connect() {
                warn!(
                    "event=stream_connect module=stream status=error delay_ms={} error={}",
                    self.reconnect_delay.as_millis(),
                    err
                );
                stats.reconnects += 1;
                pause.pause(self.reconnect_delay);
                continue;
            }
            info!("event=stream_connect module=stream status=ok");

            loop {
                match source.recv() {
                    Ok(Some(raw)) => {
                        stats.received += 1;
                        self.process(&raw, &mut stats);
                    }
                    Ok(None) => {
                        info!(
                            "event=stream_close module=stream status=ok received={} stored={} reconnects={}",
                            stats.received, stats.stored, stats.reconnects
                        );
                        return stats;
                    }
                    Err(err) => {
                        error!(
                            "event=stream_recv module=stream status=error delay_ms={} error={}",
                            self.reconnect_delay.as_millis(),
                            err
                        );
                        break;
                    }
                }
            }

            stats.reconnects += 1;
            pause.pause(self.reconnect_delay);
        }
    }

    fn process(&self, raw: &str, stats: &mut ConsumerStats) {
        match self.ingest.handle_raw(raw) {
            Ok(IngestOutcome::Stored) => stats.stored += 1,
            Ok(IngestOutcome::Duplicate) => stats.duplicates += 1,
            Ok(IngestOutcome::Rejected(_)) => stats.rejected += 1,
            Ok(IngestOutcome::Ignored) => stats.ignored += 1,
            Err(err) => {
                stats.failed += 1;
                error!("event=ingest module=stream status=error error={err}");
            }
        }
    }
}
