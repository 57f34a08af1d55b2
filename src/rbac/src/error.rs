//! Error types for authorization configuration management

use thiserror::Error;

/// Authorization configuration errors
#[derive(Debug, Error)]
pub enum RbacError {
    /// Role id does not exist in the store
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Privilege id does not exist in the store
    #[error("Privilege not found: {0}")]
    PrivilegeNotFound(String),

    /// Role id already exists in the store
    #[error("Role already exists: {0}")]
    DuplicateRole(String),

    /// Privilege id already exists in the store
    #[error("Privilege already exists: {0}")]
    DuplicatePrivilege(String),

    /// Stale version token on update
    #[error("Concurrent modification of '{id}': expected version {expected}, found {actual}")]
    ConcurrentModification {
        id: String,
        expected: String,
        actual: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Change notification could not be published
    #[error("Notification error: {0}")]
    Notification(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for authorization configuration operations
pub type Result<T> = std::result::Result<T, RbacError>;
