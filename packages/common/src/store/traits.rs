use async_trait::async_trait;

use super::error::StoreError;
use crate::content::ContentRecord;

/// A stored record together with its keyword match score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub record: ContentRecord,
    pub score: u32,
}

/// Append-only metadata store for monetized content.
///
/// Implementations must score records identically: one point per keyword
/// that occurs, case-insensitively, in the title, the JSON-encoded tags, or
/// the summary. Records scoring zero are never returned. Among equal scores,
/// earlier insertions come first.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Append a new record.
    async fn insert(&self, record: ContentRecord) -> Result<(), StoreError>;

    /// Return up to `limit` records ordered by descending match score.
    ///
    /// Callers are expected to short-circuit empty keyword lists; an empty
    /// slice yields an empty result without touching the backend.
    async fn query_by_score(
        &self,
        keywords: &[String],
        limit: u64,
    ) -> Result<Vec<ScoredRecord>, StoreError>;

    /// Look up a record by its content hash.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<ContentRecord>, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// The highest scoring record, if any keyword matched at all.
    async fn best_match(&self, keywords: &[String]) -> Result<Option<ScoredRecord>, StoreError> {
        Ok(self.query_by_score(keywords, 1).await?.into_iter().next())
    }
}
