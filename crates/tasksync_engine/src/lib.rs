//! # tasksync engine
//!
//! Sync decision state machine for tasksync.
//!
//! This crate provides the [`Reconciler`]: a pure, stateless comparison of
//! client and server snapshot metadata producing a
//! [`SyncVerdict`](tasksync_protocol::SyncVerdict).
//!
//! ## Decision table
//!
//! With an equality window ε (default 1 second):
//!
//! | Comparison | Verdict | Payload | Server-side effect |
//! |---|---|---|---|
//! | client ≈ server (within ε) | UP_TO_DATE | none | none |
//! | client < server | CLIENT_BEHIND | server snapshot | none |
//! | client > server | CLIENT_AHEAD | none | caller persists client data at `now` |
//!
//! A missing client `lastSync` forces CLIENT_BEHIND; a server with no
//! prior snapshot is seeded by the first sync from any device
//! (CLIENT_AHEAD). Whole-snapshot last-write-wins is deliberate: the
//! system targets a single human operating several devices sequentially,
//! not true multi-writer concurrency.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod reconcile;

pub use reconcile::Reconciler;
