//! Typed request bodies and the stable response envelope.
//!
//! Every flow answers with the same envelope shape: a `success` flag, a
//! numeric `code`, and optional `message` / `token` / `data` / `lastSync`
//! fields. Domain errors never cross the transport boundary as faults;
//! they are shaped into this envelope.

use crate::snapshot::Snapshot;
use crate::timestamp::SyncTimestamp;
use crate::verdict::{SyncOutcome, SyncVerdict};
use serde::{Deserialize, Serialize};

/// Response codes fixed by the protocol.
pub mod codes {
    /// Generic success.
    pub const OK: u16 = 200;
    /// Client input incomplete.
    pub const MISSING_PARAMETERS: u16 = 400;
    /// Login failed.
    pub const INCORRECT_CREDENTIALS: u16 = 401;
    /// Token missing, invalid, or bound to an unknown device.
    pub const UNAUTHENTICATED: u16 = 403;
    /// No device record for the addressed (user, device) pair.
    pub const DEVICE_NOT_FOUND: u16 = 404;
    /// A device record already exists for the addressed pair.
    pub const DUPLICATE: u16 = 409;
    /// Unexpected infrastructure failure.
    pub const INTERNAL: u16 = 500;
    /// Client and server snapshots already agree.
    pub const UP_TO_DATE: u16 = 605;
}

/// Body of a register or login request.
///
/// Fields are kept optional so validation happens explicitly at the
/// orchestrator boundary rather than during decoding; the accessors treat
/// blank strings the same as absent fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Username.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Plaintext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Device identifier.
    #[serde(rename = "device", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Platform label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl AccountRequest {
    /// The username, if present and non-blank.
    pub fn username(&self) -> Option<&str> {
        non_empty(self.username.as_deref())
    }

    /// The password, if present and non-blank.
    pub fn password(&self) -> Option<&str> {
        non_empty(self.password.as_deref())
    }

    /// The mail address, if present and non-blank.
    pub fn mail(&self) -> Option<&str> {
        non_empty(self.mail.as_deref())
    }

    /// The device identifier, if present and non-blank.
    pub fn device_id(&self) -> Option<&str> {
        non_empty(self.device_id.as_deref())
    }

    /// The platform label, if present and non-blank.
    pub fn platform(&self) -> Option<&str> {
        non_empty(self.platform.as_deref())
    }
}

/// Body of a sync request. The session token travels out-of-band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRequest {
    /// The client snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Snapshot>,
}

/// The stable response envelope every flow answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the request succeeded.
    pub success: bool,
    /// Numeric response code.
    pub code: u16,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Session token, on successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Snapshot payload, when the server pushes data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Snapshot>,
    /// The `lastSync` the client should record.
    #[serde(rename = "lastSync", default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<SyncTimestamp>,
}

impl ResponseEnvelope {
    /// A success envelope with the given code.
    pub fn success(code: u16) -> Self {
        Self {
            success: true,
            code,
            message: None,
            token: None,
            data: None,
            last_sync: None,
        }
    }

    /// A failure envelope with the given code and message.
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: Some(message.into()),
            token: None,
            data: None,
            last_sync: None,
        }
    }

    /// The canned "missing parameters" failure.
    pub fn missing_parameters() -> Self {
        Self::failure(codes::MISSING_PARAMETERS, "missing parameters")
    }

    /// The canned "incorrect credentials" failure.
    pub fn incorrect_credentials() -> Self {
        Self::failure(codes::INCORRECT_CREDENTIALS, "incorrect credentials")
    }

    /// Attaches a session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attaches a snapshot payload.
    pub fn with_data(mut self, data: Snapshot) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches the `lastSync` to report back.
    pub fn with_last_sync(mut self, last_sync: SyncTimestamp) -> Self {
        self.last_sync = Some(last_sync);
        self
    }

    /// Shapes a sync verdict into the response envelope.
    pub fn from_verdict(verdict: SyncVerdict) -> Self {
        let envelope = Self::success(verdict.outcome.code()).with_last_sync(verdict.last_sync);
        match verdict.outcome {
            SyncOutcome::ClientBehind => match verdict.payload {
                Some(snapshot) => envelope.with_data(snapshot),
                None => envelope,
            },
            SyncOutcome::UpToDate | SyncOutcome::ClientAhead => envelope,
        }
    }
}
