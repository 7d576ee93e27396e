//! Unified error type surfaced by the runtime.
//!
//! Rejected commands and mismatched snapshots are not errors; they come back
//! as data in [`CommandOutcome`](crate::CommandOutcome) and reconciliation
//! counts. `RuntimeError` covers setup and transport failures only.
use ability_core::{ConnectionId, ProfileError, SnapshotError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load content")]
    Content(#[source] anyhow::Error),

    #[error("invalid timing profile")]
    Profile(#[from] ProfileError),

    #[error("malformed snapshot record")]
    Snapshot(#[from] SnapshotError),

    #[error("snapshot batch transport failed")]
    Transport(#[from] bincode::Error),

    #[error("snapshot batch payload is {len} bytes, not a multiple of the record size")]
    RecordAlignment { len: usize },

    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("command inbox is full")]
    InboxFull,

    #[error("command inbox closed")]
    InboxClosed,
}
