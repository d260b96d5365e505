//! Model Gateway: sends the dossier prompt to an OpenAI-compatible chat completion endpoint.
//! JSON mode, temperature 0, bearer auth. No retries and no timeout on the call.

use crate::error::{ModelError, ModelResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const JSON_SYSTEM_PROMPT: &str = "You are a helpful assistant that always returns valid JSON.";

/// Produces the raw JSON-mode content for a prompt.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> ModelResult<String>;
}

/// Chat message.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    model: String,
    response_format: ResponseFormat,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub(crate) fn for_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: JSON_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// First choice's content, or `"{}"` when the completion carries none.
pub(crate) fn first_choice_content(body: &str) -> ModelResult<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;
    Ok(parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "{}".to_string()))
}

/// Gateway to the upstream completion API. The credential is fixed at construction.
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGateway {
    /// A blank key counts as no key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionBackend for OpenAiGateway {
    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingCredential)?;

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, url = %url, "requesting dossier completion");

        let res = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ChatCompletionRequest::for_prompt(&self.model, prompt))
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %text, "OpenAI error");
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        first_choice_content(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_is_deterministic_json_mode() {
        let body = serde_json::to_value(ChatCompletionRequest::for_prompt("gpt-4o-mini", "hi")).unwrap();
        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["temperature"], json!(0.0));
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][0]["content"], json!(JSON_SYSTEM_PROMPT));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn content_extraction_defaults_to_empty_object() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#;
        assert_eq!(first_choice_content(body).unwrap(), r#"{"a":1}"#);
        assert_eq!(first_choice_content(r#"{"choices":[]}"#).unwrap(), "{}");
        assert_eq!(first_choice_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(), "{}");
        assert_eq!(first_choice_content("{}").unwrap(), "{}");
        assert!(matches!(first_choice_content("<html>"), Err(ModelError::Decode(_))));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        // Port 9 (discard) is never reached: the key check comes first.
        let gateway = OpenAiGateway::new(Some("   ".into())).with_base_url("http://127.0.0.1:9");
        assert!(!gateway.has_credential());
        let err = gateway.complete("prompt").await.unwrap_err();
        assert!(matches!(err, ModelError::MissingCredential));
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set in .env");
    }
}
