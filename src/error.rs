use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// The kind of record an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Venue,
    Artist,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Venue => "venue",
            EntityKind::Artist => "artist",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A show points at a venue or artist that is not in the snapshot.
    #[error("show {show_id} references missing {kind} {id}")]
    MalformedInput {
        show_id: i64,
        kind: EntityKind,
        id: i64,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
