//! Summarizer Agent
//!
//! Condenses retrieved abstracts into plain language.

use std::sync::Arc;

use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMRequest};

const SYSTEM_INSTRUCTION: &str = "You are a medical research summarizer for text.";

pub struct SummarizerAgent {
    llm: Arc<dyn LLMAdapter>,
    model: String,
}

impl SummarizerAgent {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn create_prompt(text: &str) -> String {
        format!(
            "Summarize the following medical abstract, highlighting the key objectives, methods, \
             results, and conclusions in simple and precise language:\n\n{}",
            text
        )
    }

    pub async fn summarize(&self, text: &str) -> AppResult<String> {
        let request =
            LLMRequest::single_turn(&self.model, SYSTEM_INSTRUCTION, Self::create_prompt(text));
        self.llm.complete(&request).await
    }
}
