//! The sync decision state machine.

use std::time::Duration;
use tasksync_protocol::{Snapshot, SyncTimestamp, SyncVerdict, TimeDrift};
use tracing::debug;

/// Compares client-submitted snapshot metadata against the server's
/// authoritative snapshot and produces the verdict for one exchange.
///
/// The reconciler owns no state: both snapshots and the current time are
/// arguments, so every decision is reproducible and trivially safe to
/// retry. Persisting the client's data on CLIENT_AHEAD is the caller's
/// job, inside the per-user critical section.
#[derive(Debug, Clone)]
pub struct Reconciler {
    tolerance: Duration,
}

impl Reconciler {
    /// Default equality window, absorbing clock skew between devices and
    /// second-granularity rounding.
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(1);

    /// Creates a reconciler with the given equality window.
    pub fn new(tolerance: Duration) -> Self {
        Self { tolerance }
    }

    /// The equality window in use.
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Decides one sync exchange.
    ///
    /// `client` is the snapshot submitted by the device. `server` is the
    /// authoritative snapshot, absent when the user has never synced.
    /// `now` is the time the exchange is processed at and becomes the new
    /// server `lastSync` whenever the verdict accepts client data.
    ///
    /// A missing timestamp on either side is treated as older than
    /// everything: a fresh client is always behind a server that holds
    /// data, and a server with no prior data is seeded by the first sync
    /// from any device.
    pub fn reconcile(
        &self,
        client: &Snapshot,
        server: Option<&Snapshot>,
        now: SyncTimestamp,
    ) -> SyncVerdict {
        let Some(server) = server else {
            debug!("no server snapshot, seeding from client");
            return SyncVerdict::client_ahead(now);
        };

        let Some(client_last_sync) = client.last_sync else {
            debug!("client has no lastSync, pushing server snapshot");
            return self.push_server_snapshot(server, now);
        };

        // A server snapshot without a timestamp has never been accepted as
        // authoritative; whatever the client holds supersedes it.
        let Some(server_last_sync) = server.last_sync else {
            return SyncVerdict::client_ahead(now);
        };

        match client_last_sync.drift_from(server_last_sync, self.tolerance) {
            TimeDrift::WithinTolerance => {
                debug!(%client_last_sync, %server_last_sync, "up to date");
                SyncVerdict::up_to_date(server_last_sync)
            }
            TimeDrift::Earlier => {
                debug!(%client_last_sync, %server_last_sync, "client behind");
                self.push_server_snapshot(server, now)
            }
            TimeDrift::Later if client.has_data() => {
                debug!(%client_last_sync, %server_last_sync, "client ahead");
                SyncVerdict::client_ahead(now)
            }
            TimeDrift::Later => {
                // The client claims newer edits but submitted nothing the
                // server could accept; answer with the authoritative state
                // so it can re-sync properly.
                debug!(%client_last_sync, "client ahead without payload, pushing server snapshot");
                self.push_server_snapshot(server, now)
            }
        }
    }

    fn push_server_snapshot(&self, server: &Snapshot, now: SyncTimestamp) -> SyncVerdict {
        // A stored snapshot normally carries its lastSync; fall back to the
        // processing time if a collaborator handed us one without it.
        let last_sync = server.last_sync.unwrap_or(now);
        SyncVerdict::client_behind(server.clone(), last_sync)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}
