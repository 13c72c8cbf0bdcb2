//! Filter use-case services.
//!
//! # Responsibility
//! - Drive stream ingest and the couplet publish cycle over repository traits.
//! - Keep transports (websocket, publishing client) behind small traits.

pub mod couplet_service;
pub mod ingest_service;
pub mod pause;
pub mod stream;

pub use couplet_service::{CoupletService, CycleError, PublishError, PublishedCouplet, Publisher};
pub use ingest_service::{IngestError, IngestOutcome, IngestService};
pub use pause::{Pause, ThreadPause};
pub use stream::{ConsumerStats, MessageSource, StreamConsumer, TransportError};
