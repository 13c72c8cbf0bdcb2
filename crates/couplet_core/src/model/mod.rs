//! Domain model for lines, stored records and stream messages.
//!
//! # Responsibility
//! - Define the shapes exchanged between the classifier and its collaborators.
//!
//! # Invariants
//! - Every line is identified by the network's stable post key.
//! - All timestamps are Unix epoch milliseconds.

pub mod line;
pub mod message;

pub use line::{Line, LineRecord, LineValidationError};
pub use message::{MessageError, Operation, StreamMessage, POST_COLLECTION};
