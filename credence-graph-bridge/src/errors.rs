//! Bridge error types.

/// Errors surfaced by bridge operations.
///
/// Data-level problems (unresolved node ids in evidence, edges without
/// logic metadata, dangling endpoints) are deliberately *not* errors: the
/// bridge drops them and continues, keeping inference usable on partial
/// subgraphs.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A storage-requiring operation was called on a bridge constructed
    /// without a storage collaborator.
    #[error("storage not configured")]
    StorageNotConfigured,

    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    /// Adapter-specific storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience type alias.
pub type BridgeResult<T> = Result<T, BridgeError>;
