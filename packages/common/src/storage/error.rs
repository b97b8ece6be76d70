use std::fmt;

/// Failures of a [`BlobStore`](super::BlobStore).
#[derive(Debug)]
pub enum StorageError {
    /// No content is stored under this identifier.
    NotFound(String),
    Io(std::io::Error),
    /// The identifier is not valid for this backend.
    InvalidHash(String),
    /// Upload larger than `blob.max_size`.
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The pinning service or its download gateway misbehaved.
    Gateway(String),
}

impl StorageError {
    /// Whether the caller, rather than the backend, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidHash(_) | Self::SizeLimitExceeded { .. }
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(hash) => write!(f, "no content stored under {hash}"),
            Self::Io(err) => write!(f, "content storage I/O failed: {err}"),
            Self::InvalidHash(detail) => write!(f, "bad content identifier: {detail}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "content is {actual} bytes, over the {limit} byte limit")
            }
            Self::Gateway(detail) => write!(f, "storage gateway: {detail}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io(err) = self { Some(err) } else { None }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
