use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use super::validated;
use crate::models::{AppState, DiagnosisRequest, TriageReport};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/diagnosis", post(post_diagnosis))
        .with_state(state)
}

pub async fn post_diagnosis(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> AppResult<Json<TriageReport>> {
    let request = validated(payload)?;
    info!(description_len = request.description.len(), "Received diagnosis request");

    let report = state.triage.analyze(&request.description).await?;
    Ok(Json(report))
}
