pub mod content;
pub mod purchase;
pub mod storage;
pub mod store;

#[cfg(feature = "chain")]
pub mod chain;

pub use content::ContentRecord;
