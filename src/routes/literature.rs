use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use super::validated;
use crate::models::{AppState, LiteratureRequest};
use crate::search::LookupOutcome;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/literature", post(post_literature))
        .with_state(state)
}

/// Always answers 200: lookup failures become the simulated article or a
/// diagnostic entry in the returned array.
pub async fn post_literature(
    State(state): State<AppState>,
    payload: Result<Json<LiteratureRequest>, JsonRejection>,
) -> AppResult<Json<LookupOutcome>> {
    let request = validated(payload)?;
    let defaults = state.literature.config();
    let max_results = request.max_results.unwrap_or(defaults.max_results_default);
    let fallback_enabled = request.fallback_enabled.unwrap_or(defaults.fallback_enabled);
    info!(query = %request.query, max_results, fallback_enabled, "Received literature request");

    let outcome = state
        .literature
        .lookup(&request.query, max_results, fallback_enabled)
        .await;
    Ok(Json(outcome))
}
