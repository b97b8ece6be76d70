use common::ContentRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Natural-language search phrase.
    pub q: Option<String>,
}

/// Best match for a query; `results` holds at most one record.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub results: Vec<ContentRecord>,
    #[schema(example = 1)]
    pub total: usize,
}
