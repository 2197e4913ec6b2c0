//! Sync verdicts: the output of one reconciliation exchange.

use crate::snapshot::Snapshot;
use crate::timestamp::SyncTimestamp;

/// Outcome of comparing client and server snapshot timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Client and server agree within the tolerance window.
    UpToDate,
    /// The client is older; it must adopt the server's snapshot.
    ClientBehind,
    /// The client has newer edits; the server accepts its snapshot.
    ClientAhead,
}

impl SyncOutcome {
    /// The response code this outcome maps to on the wire.
    pub fn code(&self) -> u16 {
        match self {
            SyncOutcome::UpToDate => crate::envelope::codes::UP_TO_DATE,
            SyncOutcome::ClientBehind | SyncOutcome::ClientAhead => crate::envelope::codes::OK,
        }
    }
}

/// The result of one sync exchange.
///
/// Verdicts are computed fresh per request and never persisted. The
/// payload is present only when the server pushes newer data to the
/// client.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncVerdict {
    /// The decision.
    pub outcome: SyncOutcome,
    /// The `lastSync` timestamp reported back to the client.
    pub last_sync: SyncTimestamp,
    /// The server snapshot, when the client must adopt it.
    pub payload: Option<Snapshot>,
}

impl SyncVerdict {
    /// Both sides already agree.
    pub fn up_to_date(last_sync: SyncTimestamp) -> Self {
        Self {
            outcome: SyncOutcome::UpToDate,
            last_sync,
            payload: None,
        }
    }

    /// The client must adopt the server's snapshot.
    pub fn client_behind(snapshot: Snapshot, last_sync: SyncTimestamp) -> Self {
        Self {
            outcome: SyncOutcome::ClientBehind,
            last_sync,
            payload: Some(snapshot),
        }
    }

    /// The server accepts the client's snapshot; acknowledgement only.
    pub fn client_ahead(last_sync: SyncTimestamp) -> Self {
        Self {
            outcome: SyncOutcome::ClientAhead,
            last_sync,
            payload: None,
        }
    }

    /// Returns true if the server must persist the client's data.
    pub fn requires_persist(&self) -> bool {
        self.outcome == SyncOutcome::ClientAhead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> SyncTimestamp {
        SyncTimestamp::parse(text).unwrap()
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(SyncOutcome::UpToDate.code(), 605);
        assert_eq!(SyncOutcome::ClientBehind.code(), 200);
        assert_eq!(SyncOutcome::ClientAhead.code(), 200);
    }

    #[test]
    fn up_to_date_carries_no_payload() {
        let verdict = SyncVerdict::up_to_date(ts("2024-03-01 12:00:00"));
        assert!(verdict.payload.is_none());
        assert!(!verdict.requires_persist());
    }

    #[test]
    fn client_behind_carries_server_snapshot() {
        let verdict = SyncVerdict::client_behind(Snapshot::empty(), ts("2024-03-01 12:00:00"));
        assert_eq!(verdict.outcome, SyncOutcome::ClientBehind);
        assert!(verdict.payload.is_some());
        assert!(!verdict.requires_persist());
    }

    #[test]
    fn client_ahead_requires_persist() {
        let verdict = SyncVerdict::client_ahead(ts("2024-03-01 12:00:00"));
        assert!(verdict.payload.is_none());
        assert!(verdict.requires_persist());
    }
}
