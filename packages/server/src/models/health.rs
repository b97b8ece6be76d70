use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Number of stored content records.
    pub contents: u64,
    pub ai: bool,
    pub blobs: bool,
    pub chain: bool,
}
