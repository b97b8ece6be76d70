//! Keyword search shared by the HTTP handler and the agent tool.

use common::ContentRecord;
use common::store::{ContentStore, StoreError};
use tracing::info;

use crate::ai::KeywordExtractor;

/// Best stored match for a natural-language query.
///
/// An empty keyword list short-circuits without touching the store.
pub async fn best_match(
    keywords: &KeywordExtractor,
    store: &dyn ContentStore,
    query: &str,
) -> Result<Vec<ContentRecord>, StoreError> {
    let words = keywords.extract(query).await;
    if words.is_empty() {
        info!("No keywords extracted, returning no results");
        return Ok(vec![]);
    }

    let best = store.best_match(&words).await?;
    if let Some(hit) = &best {
        info!(hash = %hit.record.content_hash, score = hit.score, "Search matched");
    }
    Ok(best.into_iter().map(|hit| hit.record).collect())
}
