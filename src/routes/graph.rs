use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use validator::Validate;

use super::validated;
use crate::graph::{sample_reviews, GraphAnswer, GraphOverview, GraphRag, KnowledgeGraphBuild};
use crate::models::{AppState, GraphAskRequest, GraphIngestRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/graph/ingest", post(ingest))
        .route("/api/graph/ask", post(ask))
        .route("/api/graph/overview", get(overview))
        .with_state(state)
}

fn graph(state: &AppState) -> AppResult<Arc<GraphRag>> {
    state
        .graph
        .clone()
        .ok_or_else(|| AppError::Unavailable("Graph database is not configured".to_string()))
}

/// An empty body ingests the built-in sample reviews.
pub async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<KnowledgeGraphBuild>> {
    let rag = graph(&state)?;

    let request: GraphIngestRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GraphIngestRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid JSON body: {}", e)))?
    };
    request.validate()?;

    let reviews = request.reviews.unwrap_or_else(sample_reviews);
    info!(reviews = reviews.len(), "Received graph ingest request");

    let build = rag.build(&reviews).await?;
    Ok(Json(build))
}

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<GraphAskRequest>, JsonRejection>,
) -> AppResult<Json<GraphAnswer>> {
    let rag = graph(&state)?;
    let request = validated(payload)?;
    info!(question = %request.question, "Received graph question");

    let answer = rag.ask(&request.question, None).await?;
    Ok(Json(answer))
}

pub async fn overview(State(state): State<AppState>) -> AppResult<Json<GraphOverview>> {
    let rag = graph(&state)?;
    Ok(Json(rag.overview().await?))
}
