//! The sync service facade.

use crate::accounts::{AccountStore, MemoryAccountStore};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{HandlerContext, RequestHandler};
use crate::registry::{DeviceRegistry, MemoryDeviceRegistry};
use crate::snapshots::{MemorySnapshotStore, SnapshotStore};
use std::sync::Arc;
use tasksync_protocol::{AccountRequest, ResponseEnvelope, SyncRequest};
use tracing::warn;

/// The account and sync service.
///
/// Composes the request handler with the storage collaborators and
/// converts every domain error into the stable response envelope; no
/// error escapes to the transport layer as a fault. A transport
/// collaborator exposes these three entry points over HTTP.
///
/// # Example
///
/// ```
/// use tasksync_server::{ServerConfig, SyncServer};
///
/// let server = SyncServer::new(ServerConfig::new(b"signing-secret".to_vec()));
/// // In a real deployment, an HTTP layer calls server.handle_register(),
/// // handle_login(), and handle_sync().
/// ```
pub struct SyncServer {
    handler: RequestHandler,
}

impl SyncServer {
    /// Creates a server backed by in-memory stores.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryDeviceRegistry::new()),
            Arc::new(MemorySnapshotStore::new()),
        )
    }

    /// Creates a server with caller-provided storage collaborators.
    pub fn with_stores(
        config: ServerConfig,
        accounts: Arc<dyn AccountStore>,
        devices: Arc<dyn DeviceRegistry>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let context = Arc::new(HandlerContext::new(config, accounts, devices, snapshots));
        let handler = RequestHandler::new(context);
        Self { handler }
    }

    /// Handles a registration request.
    pub fn handle_register(&self, request: &AccountRequest) -> ResponseEnvelope {
        Self::respond(self.handler.handle_register(request))
    }

    /// Handles a login request.
    pub fn handle_login(&self, request: &AccountRequest) -> ResponseEnvelope {
        Self::respond(self.handler.handle_login(request))
    }

    /// Handles a sync request. The token travels out-of-band (a header)
    /// and may be absent.
    pub fn handle_sync(&self, token: Option<&str>, request: &SyncRequest) -> ResponseEnvelope {
        Self::respond(self.handler.handle_sync(token, request))
    }

    /// Shapes every outcome into the envelope.
    fn respond(result: ServerResult<ResponseEnvelope>) -> ResponseEnvelope {
        match result {
            Ok(envelope) => envelope,
            Err(error) => {
                if error.is_server_error() {
                    warn!(%error, "request failed");
                }
                ResponseEnvelope::failure(error.code(), error.to_string())
            }
        }
    }
}
