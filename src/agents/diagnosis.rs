//! Diagnosis Agent
//!
//! Asks the model which conditions could explain a set of symptoms, how they
//! are treated, and which specialist to see.

use std::sync::Arc;

use tracing::info;

use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMRequest};

const SYSTEM_INSTRUCTION: &str = "You are a helpful medical assistant.";

pub struct DiagnosisAgent {
    llm: Arc<dyn LLMAdapter>,
    model: String,
}

impl DiagnosisAgent {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn create_prompt(symptoms: &[String]) -> String {
        format!(
            "Patient has symptoms: {}. Based on the given symptoms, suggest possible medical \
             conditions that could be the cause. For each condition, explain why it might occur, \
             outline possible treatment options or cures, and recommend the type of medical \
             specialist I should consult for confirmation and proper care.",
            symptoms.join(", ")
        )
    }

    pub async fn diagnose(&self, symptoms: &[String]) -> AppResult<String> {
        info!(symptoms = ?symptoms, "Requesting diagnosis suggestion");
        let request = LLMRequest::single_turn(
            &self.model,
            SYSTEM_INSTRUCTION,
            Self::create_prompt(symptoms),
        );
        self.llm.complete(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedLLM;

    #[test]
    fn test_prompt_lists_symptoms() {
        let prompt = DiagnosisAgent::create_prompt(&["fever".to_string(), "cough".to_string()]);
        assert!(prompt.starts_with("Patient has symptoms: fever, cough. "));
        assert!(prompt.contains("medical specialist"));
    }

    #[tokio::test]
    async fn test_diagnose_trims_reply() {
        let llm = Arc::new(ScriptedLLM::new(["\n  Possibly influenza.  \n"]));
        let agent = DiagnosisAgent::new(llm.clone(), "gpt-4o-mini");

        let diagnosis = agent.diagnose(&["fever".to_string()]).await.unwrap();
        assert_eq!(diagnosis, "Possibly influenza.");

        let requests = llm.requests();
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].system_instruction.as_deref(), Some(SYSTEM_INSTRUCTION));
    }
}
