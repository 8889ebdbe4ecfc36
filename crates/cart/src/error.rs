//! Error types for snapshot persistence.

use thiserror::Error;

/// Errors that can occur while loading or saving a cart snapshot.
///
/// Decode failures are not represented here: a snapshot that fails to parse
/// is treated as absent by the loading path, not surfaced as an error.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the snapshot to JSON failed.
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
