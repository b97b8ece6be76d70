mod error;
mod memory;
mod score;
mod traits;

pub use error::StoreError;
pub use memory::InMemoryContentStore;
pub use score::{SearchFields, match_score, normalize_keywords};
pub use traits::{ContentStore, ScoredRecord};
