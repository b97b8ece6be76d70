use thiserror::Error;

/// Errors raised by [`ContentStore`](super::ContentStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table or service rejected the operation.
    #[error("content store backend error: {0}")]
    Backend(String),
    /// A stored row could not be turned back into a record.
    #[error("corrupt content row {hash}: {reason}")]
    Corrupt { hash: String, reason: String },
    /// A record with the same content hash already exists.
    #[error("content hash already stored: {0}")]
    Duplicate(String),
}
