//! Error types for the sync service core.

use tasksync_protocol::codes;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the account and sync flows.
///
/// Every variant except [`ServerError::Storage`] is a domain outcome: it
/// is shaped into the stable response envelope at the facade and never
/// propagates as a fault. Storage failures are unexpected infrastructure
/// errors and surface as the generic 500-equivalent.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Client input incomplete.
    #[error("missing parameters")]
    MissingParameters,

    /// Malformed client input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Login failed.
    #[error("incorrect credentials")]
    IncorrectCredentials,

    /// Token missing, invalid, or bound to an unknown device.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// No device record for the addressed (user, device) pair.
    #[error("unknown device {device} for user {user}")]
    DeviceNotFound {
        /// Owning username.
        user: String,
        /// Device identifier.
        device: String,
    },

    /// A device record already exists for the addressed pair.
    #[error("device {device} already registered for user {user}")]
    DuplicateDevice {
        /// Owning username.
        user: String,
        /// Device identifier.
        device: String,
    },

    /// A user record already exists for the username.
    #[error("user {0} already exists")]
    DuplicateUser(String),

    /// Storage collaborator failure, opaque to the core.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServerError {
    /// Creates an authentication failure with context.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Creates a storage failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// The envelope code this error maps to.
    pub fn code(&self) -> u16 {
        match self {
            ServerError::MissingParameters | ServerError::InvalidRequest(_) => {
                codes::MISSING_PARAMETERS
            }
            ServerError::IncorrectCredentials => codes::INCORRECT_CREDENTIALS,
            ServerError::Unauthenticated(_) => codes::UNAUTHENTICATED,
            ServerError::DeviceNotFound { .. } => codes::DEVICE_NOT_FOUND,
            ServerError::DuplicateDevice { .. } | ServerError::DuplicateUser(_) => codes::DUPLICATE,
            ServerError::Storage(_) => codes::INTERNAL,
        }
    }

    /// Returns true if this is a domain outcome caused by the client.
    pub fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Returns true if this is an infrastructure failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mapping() {
        assert_eq!(ServerError::MissingParameters.code(), 400);
        assert_eq!(ServerError::IncorrectCredentials.code(), 401);
        assert_eq!(ServerError::unauthenticated("bad token").code(), 403);
        assert_eq!(
            ServerError::DeviceNotFound {
                user: "a".into(),
                device: "b".into()
            }
            .code(),
            404
        );
        assert_eq!(ServerError::storage("disk on fire").code(), 500);
    }

    #[test]
    fn classification() {
        assert!(ServerError::MissingParameters.is_client_error());
        assert!(ServerError::IncorrectCredentials.is_client_error());
        assert!(ServerError::storage("io").is_server_error());
        assert!(!ServerError::storage("io").is_client_error());
    }

    #[test]
    fn error_display() {
        let err = ServerError::DeviceNotFound {
            user: "test".into(),
            device: "0.0.0.0".into(),
        };
        let message = err.to_string();
        assert!(message.contains("test"));
        assert!(message.contains("0.0.0.0"));
    }
}
