use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::score::{match_score, normalize_keywords};
use super::traits::{ContentStore, ScoredRecord};
use crate::content::ContentRecord;

/// Content store backed by a process-local list.
///
/// Scoring is a linear scan; suitable for prototypes and tests.
#[derive(Default)]
pub struct InMemoryContentStore {
    records: RwLock<Vec<ContentRecord>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records` in the given order.
    pub fn with_records(records: Vec<ContentRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn insert(&self, record: ContentRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.content_hash == record.content_hash) {
            return Err(StoreError::Duplicate(record.content_hash));
        }
        records.push(record);
        Ok(())
    }

    async fn query_by_score(
        &self,
        keywords: &[String],
        limit: u64,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let keywords = normalize_keywords(keywords);
        if keywords.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let records = self.records.read().await;
        let mut scored: Vec<ScoredRecord> = records
            .iter()
            .filter_map(|record| {
                let score = match_score(record, &keywords);
                (score > 0).then(|| ScoredRecord {
                    record: record.clone(),
                    score,
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit as usize);
        Ok(scored)
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<ContentRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.content_hash == hash).cloned())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }
}
