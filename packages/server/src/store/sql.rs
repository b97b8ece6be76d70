use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::content::decode_tags;
use common::store::{ContentStore, ScoredRecord, SearchFields, StoreError, normalize_keywords};
use common::ContentRecord;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Condition, LikeExpr};
use sea_orm::*;
use tracing::{debug, instrument};

use crate::entity::content;

/// A content row plus the computed `match_score` column.
#[derive(Debug, FromQueryResult)]
struct ScoredRow {
    hash: String,
    summary: String,
    tags: String,
    download: String,
    title: String,
    wallet_address: String,
    amount: String,
    contract_address: String,
    timestamp: DateTime<Utc>,
    match_score: i32,
}

/// [`ContentStore`] over the `content` table.
#[derive(Clone)]
pub struct SqlContentStore {
    db: DatabaseConnection,
}

impl SqlContentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcard characters in a search string.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `CASE WHEN search_summary LIKE ? OR search_tags LIKE ? OR search_title LIKE ? THEN 1 ELSE 0 END`
///
/// The `search_*` columns are lowercased in Rust on insert and the keyword is
/// already lowercase, so no SQL-side case folding is involved.
fn keyword_hit(keyword: &str) -> Expr {
    let pattern = format!("%{}%", escape_like(keyword));
    let contains = |col: content::Column| {
        Expr::col(col).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };
    Expr::case(
        Condition::any()
            .add(contains(content::Column::SearchSummary))
            .add(contains(content::Column::SearchTags))
            .add(contains(content::Column::SearchTitle)),
        1,
    )
    .finally(0)
    .into()
}

/// Sum of one [`keyword_hit`] per keyword. `keywords` must be non-empty.
fn match_score(keywords: &[String]) -> Expr {
    let mut terms = keywords.iter().map(|k| keyword_hit(k));
    let first = terms.next().unwrap_or_else(|| Expr::val(0).into());
    terms.fold(first, |acc, term| acc.add(term))
}

fn to_record(model: content::Model) -> Result<ContentRecord, StoreError> {
    let tags = decode_tags(&model.tags).map_err(|e| StoreError::Corrupt {
        hash: model.hash.clone(),
        reason: format!("tags: {e}"),
    })?;
    Ok(ContentRecord {
        summary: model.summary,
        tags,
        content_hash: model.hash,
        download: model.download,
        title: model.title,
        wallet_address: model.wallet_address,
        amount: model.amount,
        contract_address: model.contract_address,
        timestamp: model.timestamp,
    })
}

fn scored_to_record(row: ScoredRow) -> Result<ScoredRecord, StoreError> {
    let tags = decode_tags(&row.tags).map_err(|e| StoreError::Corrupt {
        hash: row.hash.clone(),
        reason: format!("tags: {e}"),
    })?;
    Ok(ScoredRecord {
        score: u32::try_from(row.match_score).unwrap_or(0),
        record: ContentRecord {
            summary: row.summary,
            tags,
            content_hash: row.hash,
            download: row.download,
            title: row.title,
            wallet_address: row.wallet_address,
            amount: row.amount,
            contract_address: row.contract_address,
            timestamp: row.timestamp,
        },
    })
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl ContentStore for SqlContentStore {
    #[instrument(skip(self, record), fields(hash = %record.content_hash))]
    async fn insert(&self, record: ContentRecord) -> Result<(), StoreError> {
        let search = SearchFields::of(&record);
        let row = content::ActiveModel {
            summary: Set(record.summary.clone()),
            tags: Set(record.tags_json()),
            hash: Set(record.content_hash.clone()),
            download: Set(record.download),
            title: Set(record.title),
            wallet_address: Set(record.wallet_address),
            amount: Set(record.amount),
            contract_address: Set(record.contract_address),
            timestamp: Set(record.timestamp),
            search_title: Set(search.title),
            search_tags: Set(search.tags),
            search_summary: Set(search.summary),
            ..Default::default()
        };

        match row.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::Duplicate(record.content_hash))
            }
            Err(e) => Err(backend(e)),
        }
    }

    #[instrument(skip(self))]
    async fn query_by_score(
        &self,
        keywords: &[String],
        limit: u64,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let keywords = normalize_keywords(keywords);
        if keywords.is_empty() || limit == 0 {
            return Ok(vec![]);
        }

        let score = match_score(&keywords);
        let rows = content::Entity::find()
            .select_only()
            .column(content::Column::Hash)
            .column(content::Column::Summary)
            .column(content::Column::Tags)
            .column(content::Column::Download)
            .column(content::Column::Title)
            .column(content::Column::WalletAddress)
            .column(content::Column::Amount)
            .column(content::Column::ContractAddress)
            .column(content::Column::Timestamp)
            .column_as(score.clone(), "match_score")
            .filter(score.clone().gt(0))
            .order_by_desc(score)
            .order_by_asc(content::Column::Id)
            .limit(limit)
            .into_model::<ScoredRow>()
            .all(&self.db)
            .await
            .map_err(backend)?;

        debug!(matched = rows.len(), "Scored content rows");
        rows.into_iter().map(scored_to_record).collect()
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<ContentRecord>, StoreError> {
        content::Entity::find()
            .filter(content::Column::Hash.eq(hash))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(to_record)
            .transpose()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        content::Entity::find().count(&self.db).await.map_err(backend)
    }
}
