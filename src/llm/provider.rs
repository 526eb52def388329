use async_trait::async_trait;
use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;

    /// Run the request and return the generated text, trimmed.
    async fn complete(&self, request: &LLMRequest) -> AppResult<String> {
        let response = self.create_chat_completion(request).await?;
        Ok(response.content.trim().to_string())
    }
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub api_base: Option<String>,
}

impl LLMProviderConfig {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config(crate::config::ConfigError::MissingVars(vec![
                "OPENAI_API_KEY".to_string(),
            ])))?;
        Ok(Self {
            provider: config.provider.clone(),
            api_key,
            api_base: Some(config.api_base.clone()),
        })
    }
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider: LLMProvider,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> AppResult<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| config.provider.default_api_base().to_string());
        // Every supported provider speaks the OpenAI chat-completions dialect
        let adapter: Box<dyn LLMAdapter> = Box::new(
            crate::llm::openai::OpenAIAdapter::with_api_base(&config.api_key, &api_base)?,
        );

        Ok(Self {
            adapter,
            provider: config.provider,
        })
    }

    pub fn provider(&self) -> &LLMProvider {
        &self.provider
    }
}

#[async_trait]
impl LLMAdapter for LLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        tracing::debug!(provider = %self.provider, model = %request.model, "Creating chat completion");
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(api_key: Option<&str>) -> LLMConfig {
        LLMConfig {
            provider: LLMProvider::Groq,
            api_key: api_key.map(String::from),
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "llama".to_string(),
            graph_model: "llama".to_string(),
        }
    }

    #[test]
    fn test_provider_config_requires_key() {
        let err = LLMProviderConfig::from_config(&llm_config(None))
            .err()
            .expect("missing key must fail");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_llm_keeps_provider() {
        let config = LLMProviderConfig::from_config(&llm_config(Some("key"))).unwrap();
        let llm = LLM::new(config).unwrap();
        assert_eq!(llm.provider(), &LLMProvider::Groq);
    }
}
