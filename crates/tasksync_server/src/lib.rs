//! # tasksync server
//!
//! Account, device, and sync orchestration core for tasksync.
//!
//! This crate provides:
//! - Stateless session tokens (HMAC-SHA256) binding a user to a device
//! - Fail-closed credential verification over salted digests
//! - A device registry with the `Known | Unknown` login decision
//! - The snapshot store boundary and per-user locking
//! - The [`SyncServer`] facade with the register / login / sync flows
//!
//! # Architecture
//!
//! Transport and durable storage are collaborators. An HTTP layer calls
//! the three `handle_*` entry points; storage lives behind the
//! [`AccountStore`], [`DeviceRegistry`], and [`SnapshotStore`] traits,
//! with in-memory implementations shipped for tests and embedding.
//!
//! Every flow answers with the stable response envelope; domain errors
//! never cross the boundary as faults. The sync flow runs its
//! read-reconcile-write exchange inside a per-user critical section, so
//! two devices syncing near-simultaneously can only ever resolve to
//! "second writer wins".
//!
//! # Authentication
//!
//! ```
//! use tasksync_server::{ServerConfig, TokenIssuer};
//!
//! let secret = b"my-secure-secret-32-bytes-long!".to_vec();
//! let issuer = TokenIssuer::new(secret);
//!
//! let token = issuer.issue("alice", "laptop-1").unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod accounts;
mod auth;
mod config;
mod credential;
mod error;
mod handler;
mod registry;
mod server;
mod snapshots;

pub use accounts::{AccountStore, MemoryAccountStore};
pub use auth::{TokenClaims, TokenIssuer};
pub use config::ServerConfig;
pub use credential::{verify_credentials, StoredCredential, UserRecord};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use registry::{Device, DeviceDecision, DeviceRegistry, MemoryDeviceRegistry};
pub use server::SyncServer;
pub use snapshots::{MemorySnapshotStore, SnapshotStore, UserLocks};
