use thiserror::Error;

/// Synchronization error type.
///
/// Store failures are fatal: they abort the remaining passes and propagate
/// to the driver's caller. There is no partial-success reporting and no
/// internal retry.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input that cannot be represented at all (not used for skippable
    /// declarations — those are dropped with a warning instead).
    #[error("validation: {0}")]
    Validation(String),

    /// Storage backend failure (lookup, create, grant or commit).
    #[error("storage: {0}")]
    Storage(String),

    /// Unexpected internal error (serialization, lock poisoning).
    #[error("internal: {0}")]
    Internal(String),
}
