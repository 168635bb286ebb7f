//! Text-completion client
//!
//! Optional integration with an OpenAI-compatible chat endpoint. The rest
//! of the application only sees [`CompletionClient`]; when the provider is
//! disabled or misconfigured it gets the no-op variant and every completion
//! is `None`. Failures never propagate past this module.

use serde_json::{json, Value};
use std::cell::RefCell;
use std::time::Duration;
use tracing::warn;

use crate::config::LlmConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability interface for narrative generation.
pub trait CompletionClient {
    /// Completion text for the given prompts, or `None` on any transport,
    /// auth or malformed-response failure. Callers treat `None` the same
    /// as "feature disabled".
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Option<String>;

    /// One-line state description for the status display.
    fn status_line(&self) -> String;

    /// Most recent failure, kept for diagnostics only.
    fn last_error(&self) -> Option<String> {
        None
    }
}

/// No-op variant used when the integration is off or misconfigured.
pub struct DisabledClient {
    status: String,
}

impl CompletionClient for DisabledClient {
    fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Option<String> {
        None
    }

    fn status_line(&self) -> String {
        self.status.clone()
    }
}

/// Live client for OpenAI-compatible chat completion endpoints.
pub struct OpenAiCompatClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f64,
    last_error: RefCell<Option<String>>,
}

impl OpenAiCompatClient {
    fn new(config: &LlmConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            last_error: RefCell::new(None),
        }
    }

    fn record_failure(&self, message: String) -> Option<String> {
        warn!("completion request failed: {message}");
        *self.last_error.borrow_mut() = Some(message);
        None
    }
}

fn extract_content(body: &Value) -> Option<String> {
    let content = body
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?
        .trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

impl CompletionClient for OpenAiCompatClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Option<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(payload);

        let response = match response {
            Ok(response) => response,
            Err(err) => return self.record_failure(err.to_string()),
        };

        let body: Value = match response.into_json() {
            Ok(body) => body,
            Err(err) => return self.record_failure(err.to_string()),
        };

        match extract_content(&body) {
            Some(content) => Some(content),
            None => self.record_failure("response carried no completion text".to_string()),
        }
    }

    fn status_line(&self) -> String {
        "AI status: enabled (openai_compatible).".to_string()
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }
}

/// Select the client variant for the configured provider.
///
/// Unknown providers and missing required fields disable the integration;
/// they are never an error.
pub fn client_from_config(config: &LlmConfig) -> Box<dyn CompletionClient> {
    match config.provider.as_str() {
        "none" => Box::new(DisabledClient {
            status: "AI status: disabled (set llm provider to openai_compatible to enable)."
                .to_string(),
        }),
        "openai_compatible" => {
            if config.api_key.is_empty() || config.endpoint.is_empty() || config.model.is_empty() {
                Box::new(DisabledClient {
                    status: "AI status: missing api_key / endpoint / model.".to_string(),
                })
            } else {
                Box::new(OpenAiCompatClient::new(config))
            }
        }
        other => Box::new(DisabledClient {
            status: format!("AI status: unknown provider '{other}'."),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_none_selects_the_disabled_client() {
        let client = client_from_config(&LlmConfig::default());
        assert_eq!(client.complete("system", "user"), None);
        assert!(client.status_line().contains("disabled"));
    }

    #[test]
    fn unknown_provider_disables_instead_of_erroring() {
        let config = LlmConfig {
            provider: "mystery".to_string(),
            ..LlmConfig::default()
        };
        let client = client_from_config(&config);
        assert_eq!(client.complete("system", "user"), None);
        assert!(client.status_line().contains("mystery"));
    }

    #[test]
    fn missing_required_fields_disable_the_live_client() {
        let config = LlmConfig {
            provider: "openai_compatible".to_string(),
            endpoint: "https://api.example.com/v1/chat/completions".to_string(),
            // model and api_key absent
            ..LlmConfig::default()
        };
        let client = client_from_config(&config);
        assert_eq!(client.complete("system", "user"), None);
        assert!(client.status_line().contains("missing"));
    }

    #[test]
    fn content_extraction_handles_malformed_bodies() {
        let good = json!({"choices": [{"message": {"content": "  Hello.  "}}]});
        assert_eq!(extract_content(&good), Some("Hello.".to_string()));

        for bad in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": "   "}}]}),
        ] {
            assert_eq!(extract_content(&bad), None);
        }
    }
}
