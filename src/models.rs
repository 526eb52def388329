use std::sync::Arc;

use validator::{Validate, ValidationError};

use crate::agents::TriagePipeline;
use crate::config::Config;
use crate::graph::{GraphRag, GraphStore};
use crate::llm::LLMAdapter;
use crate::search::PubMedClient;
use crate::types::{AppError, AppResult};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub literature: PubMedClient,
    pub triage: Arc<TriagePipeline>,
    /// `None` when the graph database is not configured
    pub graph: Option<Arc<GraphRag>>,
}

impl AppState {
    pub fn new(
        config: Config,
        llm: Arc<dyn LLMAdapter>,
        graph_store: Option<Arc<dyn GraphStore>>,
    ) -> AppResult<Self> {
        let literature = PubMedClient::new(config.literature.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create PubMed client: {}", e)))?;
        let triage = TriagePipeline::new(llm.clone(), &config.llm.model, literature.clone());
        let graph = graph_store
            .map(|store| Arc::new(GraphRag::new(llm, store, config.llm.graph_model.clone())));

        Ok(Self {
            config,
            literature,
            triage: Arc::new(triage),
            graph,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn reviews_not_blank(reviews: &[String]) -> Result<(), ValidationError> {
    if reviews.iter().any(|r| r.trim().is_empty()) {
        return Err(ValidationError::new("blank_review"));
    }
    Ok(())
}

// API Request/Response types

#[derive(Debug, serde::Deserialize, Validate)]
pub struct DiagnosisRequest {
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub description: String,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct LiteratureRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub query: String,
    #[validate(range(min = 1, max = 20))]
    pub max_results: Option<usize>,
    pub fallback_enabled: Option<bool>,
}

#[derive(Debug, Default, serde::Deserialize, Validate)]
pub struct GraphIngestRequest {
    /// Reviews to ingest; the built-in samples are used when absent
    #[validate(length(min = 1, max = 50), custom(function = "reviews_not_blank"))]
    pub reviews: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct GraphAskRequest {
    #[validate(length(min = 1, max = 1000), custom(function = "not_blank"))]
    pub question: String,
}

/// Result of the triage pipeline
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TriageReport {
    pub symptom: Vec<String>,
    pub diagnosis: String,
    pub pubmed_summary: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// "configured" or "disabled"
    pub graph: String,
}
