//! Request handlers for the account and sync flows.
//!
//! The handler owns no logic beyond sequencing: it validates the typed
//! request at the boundary, delegates to the credential verifier, token
//! issuer, device registry, and reconciler, and shapes the outcome into
//! the response envelope.

use crate::accounts::AccountStore;
use crate::auth::TokenIssuer;
use crate::config::ServerConfig;
use crate::credential::{verify_credentials, StoredCredential, UserRecord};
use crate::error::{ServerError, ServerResult};
use crate::registry::{Device, DeviceDecision, DeviceRegistry};
use crate::snapshots::{SnapshotStore, UserLocks};
use std::sync::Arc;
use tasksync_engine::Reconciler;
use tasksync_protocol::{
    codes, AccountRequest, ResponseEnvelope, Snapshot, SyncRequest, SyncTimestamp,
};
use tracing::{debug, info};

/// Context shared by all request handlers.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// User account storage.
    pub accounts: Arc<dyn AccountStore>,
    /// Device registry storage.
    pub devices: Arc<dyn DeviceRegistry>,
    /// Authoritative snapshot storage.
    pub snapshots: Arc<dyn SnapshotStore>,
    issuer: TokenIssuer,
    reconciler: Reconciler,
    locks: UserLocks,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(
        config: ServerConfig,
        accounts: Arc<dyn AccountStore>,
        devices: Arc<dyn DeviceRegistry>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let issuer = TokenIssuer::new(config.secret.clone());
        let reconciler = Reconciler::new(config.tolerance);
        Self {
            config,
            accounts,
            devices,
            snapshots,
            issuer,
            reconciler,
            locks: UserLocks::new(),
        }
    }
}

/// The validated fields every account flow requires.
struct AccountFields<'a> {
    username: &'a str,
    password: &'a str,
    mail: &'a str,
    device_id: &'a str,
}

/// Validates the request body before any field is consumed.
fn required_fields(request: &AccountRequest) -> ServerResult<AccountFields<'_>> {
    match (
        request.username(),
        request.password(),
        request.mail(),
        request.device_id(),
    ) {
        (Some(username), Some(password), Some(mail), Some(device_id)) => Ok(AccountFields {
            username,
            password,
            mail,
            device_id,
        }),
        _ => Err(ServerError::MissingParameters),
    }
}

/// Handler for the account and sync flows.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles a registration request.
    ///
    /// Creates the user and the initiating device. Both creations are
    /// idempotent on conflict: re-registering an existing user or device
    /// is not an error. No token is issued; login is a separate step.
    pub fn handle_register(&self, request: &AccountRequest) -> ServerResult<ResponseEnvelope> {
        let fields = required_fields(request)?;
        info!(user = fields.username, device = fields.device_id, "register");

        if self.context.accounts.find(fields.username)?.is_none() {
            self.context.accounts.create(UserRecord {
                username: fields.username.to_string(),
                mail: fields.mail.to_string(),
                credential: StoredCredential::derive(fields.password),
            })?;
        }

        if !self.context.devices.exists(fields.username, fields.device_id)? {
            self.context.devices.register(Device {
                username: fields.username.to_string(),
                device_id: fields.device_id.to_string(),
                platform: request.platform().map(str::to_string),
                last_token: None,
            })?;
        }

        Ok(ResponseEnvelope::success(codes::OK))
    }

    /// Handles a login request.
    ///
    /// Verifies credentials, then either updates the known device or
    /// registers the unseen one, and issues a fresh token either way.
    pub fn handle_login(&self, request: &AccountRequest) -> ServerResult<ResponseEnvelope> {
        let fields = required_fields(request)?;

        let record = self.context.accounts.find(fields.username)?;
        if !verify_credentials(fields.username, fields.password, fields.mail, record.as_ref()) {
            info!(user = fields.username, "login rejected");
            return Err(ServerError::IncorrectCredentials);
        }

        let token = self.context.issuer.issue(fields.username, fields.device_id)?;

        match self.context.devices.decide(fields.username, fields.device_id)? {
            DeviceDecision::Known(_) => {
                self.context.devices.update(
                    fields.username,
                    fields.device_id,
                    request.platform(),
                    Some(&token),
                )?;
            }
            DeviceDecision::Unknown => {
                self.context.devices.register(Device {
                    username: fields.username.to_string(),
                    device_id: fields.device_id.to_string(),
                    platform: request.platform().map(str::to_string),
                    last_token: Some(token.clone()),
                })?;
            }
        }

        info!(user = fields.username, device = fields.device_id, "login");
        Ok(ResponseEnvelope::success(codes::OK).with_token(token))
    }

    /// Handles a sync request.
    ///
    /// Resolves the token to a (user, device) identity, confirms the
    /// device is registered, and runs the read-reconcile-write exchange
    /// inside the user's critical section.
    pub fn handle_sync(
        &self,
        token: Option<&str>,
        request: &SyncRequest,
    ) -> ServerResult<ResponseEnvelope> {
        let token = token.ok_or_else(|| ServerError::unauthenticated("missing token"))?;
        let claims = self.context.issuer.verify(token)?;

        if !self.context.devices.exists(&claims.username, &claims.device_id)? {
            return Err(ServerError::unauthenticated("device not registered"));
        }

        let client = request.data.clone().unwrap_or_else(Snapshot::empty);

        let lock = self.context.locks.lock_for(&claims.username);
        let _guard = lock.lock();

        let server = self.context.snapshots.load(&claims.username)?;
        let now = SyncTimestamp::now();
        let verdict = self
            .context
            .reconciler
            .reconcile(&client, server.as_ref(), now);

        if verdict.requires_persist() {
            self.context
                .snapshots
                .save(&claims.username, client.with_last_sync(verdict.last_sync))?;
        }

        debug!(
            user = %claims.username,
            device = %claims.device_id,
            outcome = ?verdict.outcome,
            "sync"
        );
        Ok(ResponseEnvelope::from_verdict(verdict))
    }
}
