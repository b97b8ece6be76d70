use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::search::*;
use crate::search::best_match;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    operation_id = "searchContent",
    summary = "Find the best matching content",
    description = "Extracts keywords from `q` with the AI model, scores every record by how many keywords appear in its title, tags or summary, and returns the single best match. Records matching no keyword are never returned.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Best match, if any", body = SearchResponse),
        (status = 400, description = "Missing query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "AI not configured or store failure (CONFIGURATION_ERROR, STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn search_content(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::Validation("Query parameter 'q' is required.".into()));
    }

    let keywords = state.keywords.require()?;
    let results = best_match(keywords, state.contents.as_ref(), q).await?;
    Ok(Json(SearchResponse {
        total: results.len(),
        results,
    }))
}
