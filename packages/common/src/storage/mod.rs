mod error;
mod hash;
mod traits;

pub mod filesystem;
#[cfg(feature = "gateway")]
pub mod gateway;

pub use error::StorageError;
pub use hash::ContentHash;
pub use traits::{BlobStore, StoredBlob};
