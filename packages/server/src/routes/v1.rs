use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(content_routes())
        .routes(routes!(handlers::search::search_content))
        .routes(routes!(handlers::agent::message_agent))
        .routes(routes!(handlers::health::health))
}

fn content_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::content::upload_content))
        .routes(routes!(handlers::content::fetch_content))
        .routes(routes!(handlers::content::fetch_content_batch))
}
