//! Agent System
//!
//! The triage helper is a straight pipeline over three agents and the
//! PubMed client:
//!
//! ```text
//! Patient description
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Symptom    │  → keyword list (regex, no model)
//! │  Extractor  │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Diagnosis   │  → suggested conditions
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   PubMed    │  → related articles (never fails)
//! │   lookup    │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Summarizer  │  → plain-language summary
//! │   Agent     │
//! └─────────────┘
//! ```

pub mod diagnosis;
pub mod summarizer;
pub mod symptoms;

pub use diagnosis::DiagnosisAgent;
pub use summarizer::SummarizerAgent;
pub use symptoms::extract_symptoms;

use std::sync::Arc;

use tracing::info;

use crate::llm::LLMAdapter;
use crate::models::TriageReport;
use crate::search::PubMedClient;
use crate::types::{AppError, AppResult};
use crate::utils::truncate_chars;

/// Characters of the article payload handed to the summarizer
pub const SUMMARY_INPUT_CHARS: usize = 3000;

pub struct TriagePipeline {
    diagnosis: DiagnosisAgent,
    summarizer: SummarizerAgent,
    literature: PubMedClient,
}

impl TriagePipeline {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: &str, literature: PubMedClient) -> Self {
        Self {
            diagnosis: DiagnosisAgent::new(llm.clone(), model),
            summarizer: SummarizerAgent::new(llm, model),
            literature,
        }
    }

    /// Execute the full triage pipeline for a patient description
    pub async fn analyze(&self, description: &str) -> AppResult<TriageReport> {
        info!(description_len = description.len(), "Starting triage pipeline");

        let symptoms = extract_symptoms(description);
        info!(symptoms = ?symptoms, "Symptoms extracted");

        let diagnosis = self.diagnosis.diagnose(&symptoms).await?;

        let articles = self.literature.lookup_default(&symptoms.join(" ")).await;
        info!(count = articles.len(), unavailable = articles.is_unavailable(), "Literature lookup complete");

        let payload = serde_json::to_string(&articles)
            .map_err(|e| AppError::Internal(format!("Failed to serialize articles: {}", e)))?;
        let pubmed_summary = self
            .summarizer
            .summarize(truncate_chars(&payload, SUMMARY_INPUT_CHARS))
            .await?;

        info!(summary_len = pubmed_summary.len(), "Triage pipeline complete");

        Ok(TriageReport {
            symptom: symptoms,
            diagnosis,
            pubmed_summary,
        })
    }
}
