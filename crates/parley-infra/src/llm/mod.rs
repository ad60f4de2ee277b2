//! OpenAI-compatible agent pipeline and summarizer.
//!
//! One [`OpenAiCompatClient`] implements both [`AgentPipeline`] and
//! [`Summarizer`] over the chat-completions protocol. The default endpoint
//! is a local Ollama server's `/v1` API; any OpenAI-compatible base URL works.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

pub mod prompt;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{ChatCompletionRequestMessage, CreateChatCompletionRequest};
use secrecy::{ExposeSecret, SecretString};

use parley_core::pipeline::{AgentPipeline, Summarizer};
use parley_types::catalog::{AgentSpec, TaskSpec};
use parley_types::config::LlmConfig;
use parley_types::error::PipelineError;
use parley_types::pipeline::PipelineOutput;

/// Chat-completions client for agents and summaries.
///
/// Does NOT derive Debug: the inner `async_openai::Client` holds the API key.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    summary_temperature: f32,
    max_tokens: u32,
}

/// Read the API key from the environment variable named in the config.
///
/// Local servers such as Ollama need no key, so absence is not an error.
pub fn resolve_api_key(config: &LlmConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig, api_key: Option<SecretString>) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_base(&config.base_url);
        if let Some(key) = api_key {
            openai_config = openai_config.with_api_key(key.expose_secret());
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            summary_temperature: config.summary_temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build from config, taking the key from the environment.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config, resolve_api_key(config))
    }

    fn build_request(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        model: Option<&str>,
        temperature: f32,
    ) -> CreateChatCompletionRequest {
        CreateChatCompletionRequest {
            model: model.unwrap_or(&self.model).to_string(),
            messages,
            max_completion_tokens: Some(self.max_tokens),
            temperature: Some(temperature),
            ..Default::default()
        }
    }

    /// Send a request and return the first choice's text, if any.
    async fn complete(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<Option<String>, PipelineError> {
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PipelineError::Request(e.to_string()))?;

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|text| !text.trim().is_empty()))
    }
}

impl AgentPipeline for OpenAiCompatClient {
    async fn invoke(
        &self,
        agent: &AgentSpec,
        task: &TaskSpec,
        context: &str,
        input: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        let request = self.build_request(
            prompt::agent_messages(agent, task, context, input),
            agent.model.as_deref(),
            agent.temperature.unwrap_or(self.temperature),
        );

        let started = std::time::Instant::now();
        let output = match self.complete(request).await? {
            Some(text) => PipelineOutput::text(text),
            None => PipelineOutput::failed(PipelineError::EmptyResponse.to_string()),
        };
        tracing::debug!(
            agent = %agent.name,
            task = %task.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion received"
        );
        Ok(output)
    }
}

impl Summarizer for OpenAiCompatClient {
    #[tracing::instrument(skip_all, fields(history_chars = history.len()))]
    async fn summarize(&self, history: &str) -> Result<String, PipelineError> {
        let request = self.build_request(
            prompt::summary_messages(history),
            None,
            self.summary_temperature,
        );
        self.complete(request)
            .await?
            .ok_or(PipelineError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            model: "mixtral".into(),
            max_tokens: 512,
            ..LlmConfig::default()
        }
    }

    fn agent(model: Option<&str>, temperature: Option<f32>) -> AgentSpec {
        AgentSpec {
            name: "writer".into(),
            role: "Writer".into(),
            goal: "Write".into(),
            backstory: String::new(),
            model: model.map(str::to_string),
            temperature,
        }
    }

    fn task() -> TaskSpec {
        TaskSpec {
            name: "poem".into(),
            description: "Write about {content}".into(),
            expected_output: "A poem".into(),
        }
    }

    #[test]
    fn test_request_uses_configured_defaults() {
        let client = OpenAiCompatClient::new(&config(), None);
        let a = agent(None, None);
        let req = client.build_request(
            prompt::agent_messages(&a, &task(), "", "rust"),
            a.model.as_deref(),
            a.temperature.unwrap_or(client.temperature),
        );

        assert_eq!(req.model, "mixtral");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.max_completion_tokens, Some(512));
        assert_eq!(req.temperature, Some(0.7));
    }

    #[test]
    fn test_agent_overrides_model_and_temperature() {
        let client = OpenAiCompatClient::new(&config(), Some(SecretString::from("sk-test".to_string())));
        let a = agent(Some("llama3"), Some(0.1));
        let req = client.build_request(
            prompt::agent_messages(&a, &task(), "", "rust"),
            a.model.as_deref(),
            a.temperature.unwrap_or(client.temperature),
        );

        assert_eq!(req.model, "llama3");
        assert_eq!(req.temperature, Some(0.1));
    }

    #[test]
    fn test_summary_request_uses_summary_temperature() {
        let client = OpenAiCompatClient::new(&config(), None);
        let req = client.build_request(prompt::summary_messages("User: hi"), None, client.summary_temperature);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.temperature, Some(0.3));
    }

    #[test]
    fn test_resolve_api_key_missing_env() {
        let config = LlmConfig {
            api_key_env: "PARLEY_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..LlmConfig::default()
        };
        assert!(resolve_api_key(&config).is_none());
    }
}
