//! Error types for protocol parsing.

use thiserror::Error;

/// Errors that can occur while decoding protocol values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A textual timestamp did not match the wire format.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
