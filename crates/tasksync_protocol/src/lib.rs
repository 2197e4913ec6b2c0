//! # tasksync protocol
//!
//! Protocol types and wire shapes for tasksync.
//!
//! This crate provides:
//! - [`SyncTimestamp`] — second-granularity timestamps with tolerant comparison
//! - [`Snapshot`] — the whole-snapshot task/label payload
//! - [`SyncVerdict`] — the outcome of one reconciliation exchange
//! - Request bodies and the stable [`ResponseEnvelope`]
//!
//! This is a pure protocol crate with no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod snapshot;
mod timestamp;
mod verdict;

pub use envelope::{codes, AccountRequest, ResponseEnvelope, SyncRequest};
pub use error::ProtocolError;
pub use snapshot::{Label, Snapshot, Task};
pub use timestamp::{SyncTimestamp, TimeDrift};
pub use verdict::{SyncOutcome, SyncVerdict};
