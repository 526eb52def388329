//! API Routes
//!
//! - `/api/health` - Health check
//! - `/api/diagnosis` - Symptom triage pipeline
//! - `/api/literature` - PubMed lookup with fallback
//! - `/api/graph/ingest`, `/api/graph/ask`, `/api/graph/overview` - Hotel review graph chatbot

pub mod diagnosis;
pub mod graph;
pub mod health;
pub mod literature;

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::Request,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::{cors_layer, rate_limiter, rate_limiter_middleware};
use crate::models::AppState;
use crate::types::{AppError, AppResult};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let limiter = rate_limiter(state.config.server.rate_limit_per_second);
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(health::router(state.clone()))
        .merge(diagnosis::router(state.clone()))
        .merge(literature::router(state.clone()))
        .merge(graph::router(state))
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limiter_middleware,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}

/// Unwrap a JSON body and run its validation rules. Both failures are 400s.
pub(crate) fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    request.validate()?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::graph::store::memory::RecordingStore;
    use crate::graph::GraphStore;
    use crate::llm::scripted::ScriptedLLM;

    fn offline_config() -> Config {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.literature.search_endpoint = "http://127.0.0.1:1/esearch.fcgi".to_string();
        config.literature.fetch_endpoint = "http://127.0.0.1:1/efetch.fcgi".to_string();
        config
    }

    fn app(llm: ScriptedLLM, store: Option<Arc<RecordingStore>>) -> Router {
        let store = store.map(|s| s as Arc<dyn GraphStore>);
        let state = AppState::new(offline_config(), Arc::new(llm), store).unwrap();
        create_router(state)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_graph_state() {
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(ScriptedLLM::default(), None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["graph"], "disabled");

        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let store = Arc::new(RecordingStore::default());
        let (_, body) = send(app(ScriptedLLM::default(), Some(store)), request).await;
        assert_eq!(body["graph"], "configured");
    }

    #[tokio::test]
    async fn test_diagnosis_returns_report() {
        let llm = ScriptedLLM::new(["Likely a viral infection.", "Studies suggest rest."]);
        let (status, body) = send(
            app(llm, None),
            post("/api/diagnosis", serde_json::json!({ "description": "fever and cough" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symptom"], serde_json::json!(["fever", "cough"]));
        assert_eq!(body["diagnosis"], "Likely a viral infection.");
        assert_eq!(body["pubmed_summary"], "Studies suggest rest.");
    }

    #[tokio::test]
    async fn test_diagnosis_llm_failure_is_bad_gateway() {
        let (status, body) = send(
            app(ScriptedLLM::failing("invalid api key"), None),
            post("/api/diagnosis", serde_json::json!({ "description": "fever" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_bad_requests() {
        let (status, _) = send(
            app(ScriptedLLM::default(), None),
            post("/api/diagnosis", serde_json::json!({ "description": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app(ScriptedLLM::default(), None),
            post("/api/diagnosis", serde_json::json!({ "text": "fever" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app(ScriptedLLM::default(), None),
            post(
                "/api/literature",
                serde_json::json!({ "query": "fever", "max_results": 21 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_literature_falls_back_when_pubmed_unreachable() {
        let (status, body) = send(
            app(ScriptedLLM::default(), None),
            post("/api/literature", serde_json::json!({ "query": "fever" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Simulated Study on Fever");
        assert_eq!(body[0]["authors"], serde_json::json!(["John Doe", "Jane Smith"]));
    }

    #[tokio::test]
    async fn test_literature_without_fallback_returns_diagnostic() {
        let (status, body) = send(
            app(ScriptedLLM::default(), None),
            post(
                "/api/literature",
                serde_json::json!({ "query": "fever", "fallback_enabled": false }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert!(body[0]["message"].as_str().unwrap().starts_with("Error: "));
        assert!(body[0].get("title").is_none());
    }

    #[tokio::test]
    async fn test_graph_routes_unavailable_without_store() {
        let (status, body) = send(
            app(ScriptedLLM::default(), None),
            post("/api/graph/ask", serde_json::json!({ "question": "Which hotels?" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_ingest_without_body_uses_samples() {
        let mut replies = Vec::new();
        for i in 0..5 {
            replies.push(format!("Hotel {i},is_located_in,Dubai"));
            replies.push(format!("CREATE (h{i}:Hotel {{name: 'Hotel {i}'}})"));
        }
        let store = Arc::new(RecordingStore::default());
        let request = Request::builder()
            .method("POST")
            .uri("/api/graph/ingest")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(ScriptedLLM::new(replies), Some(store.clone())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["executed"], 5);
        assert_eq!(body["ontologies"].as_array().unwrap().len(), 5);
        assert_eq!(body["failures"], serde_json::json!([]));
        assert_eq!(store.statements.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_ask_returns_answer() {
        let llm = ScriptedLLM::new(["MATCH (h:Hotel) RETURN h.name AS name", "The Creek Hotel."]);
        let store = Arc::new(RecordingStore::default());
        let (status, body) = send(
            app(llm, Some(store)),
            post("/api/graph/ask", serde_json::json!({ "question": "Which hotels?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cypher"], "MATCH (h:Hotel) RETURN h.name AS name");
        assert_eq!(body["answer"], "The Creek Hotel.");
    }

    #[tokio::test]
    async fn test_overview_route() {
        let request = || {
            Request::builder()
                .uri("/api/graph/overview")
                .body(Body::empty())
                .unwrap()
        };
        let (status, _) = send(app(ScriptedLLM::default(), None), request()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let mut relation = crate::graph::GraphRow::new();
        relation.insert("hotel".to_string(), serde_json::json!("Kensington Hotel"));
        relation.insert("relation".to_string(), serde_json::json!("is_located_in"));
        relation.insert("node_type".to_string(), serde_json::json!("Location"));
        relation.insert("related_entity".to_string(), serde_json::json!("Oslo"));
        let store = Arc::new(RecordingStore {
            rows_by_marker: vec![("type(r)".to_string(), vec![relation])],
            ..Default::default()
        });

        let (status, body) = send(app(ScriptedLLM::default(), Some(store)), request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["nodes"],
            serde_json::json!([
                { "id": "Kensington Hotel", "label": "Kensington Hotel", "color": "red" },
                { "id": "Oslo", "label": "Oslo", "color": "blue" }
            ])
        );
        assert_eq!(
            body["edges"],
            serde_json::json!([{ "from": "Kensington Hotel", "to": "Oslo", "label": "is_located_in" }])
        );
    }
}
