//! Graph RAG over hotel reviews.
//!
//! Reviews are turned into relationship tuples, then into Cypher `CREATE`
//! statements that populate the graph. Questions are answered by generating a
//! retrieval query, running it, and handing the rows back to the model. The
//! overview lists every hotel and its relationships as a colored network.

pub mod cypher;
pub mod overview;
pub mod prompts;
pub mod samples;
pub mod store;

pub use cypher::strip_markdown_code_blocks;
pub use overview::{GraphOverview, OverviewEdge, OverviewNode};
pub use samples::sample_reviews;
pub use store::{GraphRow, GraphStore, Neo4jStore};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest};

const ANSWER_TEMPERATURE: f32 = 0.7;

/// Artifacts of one ingest run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraphBuild {
    pub ontologies: Vec<String>,
    pub creation_queries: Vec<String>,
    pub executed: usize,
    pub failures: Vec<StatementFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementFailure {
    pub query: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphAnswer {
    pub question: String,
    pub cypher: String,
    pub rows: Vec<GraphRow>,
    pub answer: String,
}

pub struct GraphRag {
    llm: Arc<dyn LLMAdapter>,
    store: Arc<dyn GraphStore>,
    model: String,
}

impl GraphRag {
    pub fn new(llm: Arc<dyn LLMAdapter>, store: Arc<dyn GraphStore>, model: impl Into<String>) -> Self {
        Self {
            llm,
            store,
            model: model.into(),
        }
    }

    /// Relationship tuples found in one review, one per line
    pub async fn identify_relationships(&self, review: &str) -> AppResult<String> {
        let request = LLMRequest::single_turn(
            &self.model,
            prompts::ontology_system_prompt(),
            prompts::ontology_user_prompt(review),
        )
        .with_temperature(0.0);
        self.llm.complete(&request).await
    }

    pub async fn generate_creation_cypher(&self, ontology: &str) -> AppResult<String> {
        let request = LLMRequest::single_turn(
            &self.model,
            prompts::CREATION_SYSTEM_PROMPT,
            prompts::creation_user_prompt(ontology),
        )
        .with_temperature(0.0);
        self.llm.complete(&request).await
    }

    /// Extract, generate, then execute creation queries for every review.
    /// A rejected statement is recorded and the rest still run.
    pub async fn build(&self, reviews: &[String]) -> AppResult<KnowledgeGraphBuild> {
        info!(reviews = reviews.len(), "Building knowledge graph");
        let mut build = KnowledgeGraphBuild::default();

        for review in reviews {
            let ontology = self.identify_relationships(review).await?;
            let creation = self.generate_creation_cypher(&ontology).await?;
            build.ontologies.push(ontology);
            build
                .creation_queries
                .push(strip_markdown_code_blocks(&creation).to_string());
        }

        for query in &build.creation_queries {
            match self.store.run(query).await {
                Ok(_) => build.executed += 1,
                Err(e) => {
                    warn!(error = %e, "Creation statement failed");
                    build.failures.push(StatementFailure {
                        query: query.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            executed = build.executed,
            failed = build.failures.len(),
            "Knowledge graph build complete"
        );
        Ok(build)
    }

    pub async fn generate_retrieval_cypher(
        &self,
        question: &str,
        example_creation: Option<&str>,
    ) -> AppResult<String> {
        let example = example_creation.unwrap_or(prompts::EXAMPLE_CREATION_CYPHER);
        let request = LLMRequest::single_turn(
            &self.model,
            prompts::retrieval_system_prompt(example),
            prompts::retrieval_user_prompt(question),
        )
        .with_temperature(0.0);
        let raw = self.llm.complete(&request).await?;
        Ok(strip_markdown_code_blocks(&raw).to_string())
    }

    /// Answer a question from the rows its generated query returns
    pub async fn ask(&self, question: &str, example_creation: Option<&str>) -> AppResult<GraphAnswer> {
        let cypher = self.generate_retrieval_cypher(question, example_creation).await?;
        if cypher.is_empty() {
            return Err(AppError::LLMApi(
                "Model returned an empty retrieval query".to_string(),
            ));
        }
        info!(cypher = %cypher, "Running retrieval query");

        let rows = self.store.run(&cypher).await?;
        let information = serde_json::to_string(&rows)
            .map_err(|e| AppError::Internal(format!("Failed to serialize rows: {}", e)))?;

        let request = LLMRequest::single_turn(
            &self.model,
            prompts::ANSWER_SYSTEM_PROMPT,
            prompts::answer_user_prompt(question, &information),
        )
        .with_temperature(ANSWER_TEMPERATURE);
        let answer = self.llm.complete(&request).await?;

        Ok(GraphAnswer {
            question: question.to_string(),
            cypher,
            rows,
            answer,
        })
    }

    pub async fn overview(&self) -> AppResult<GraphOverview> {
        let hotels = self.store.run(overview::HOTEL_NAMES_QUERY).await?;
        let relations = self.store.run(overview::HOTEL_RELATIONS_QUERY).await?;
        let overview = GraphOverview::from_rows(&hotels, &relations);
        info!(
            nodes = overview.nodes.len(),
            edges = overview.edges.len(),
            "Graph overview assembled"
        );
        Ok(overview)
    }
}
