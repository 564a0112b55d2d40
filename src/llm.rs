use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::constants::EXTRACTION_FUNCTION_NAME;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to reach language model at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("language model request failed with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to decode language model response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("language model returned no choices")]
    NoChoices,
    #[error("language model returned no {0}")]
    MissingField(&'static str),
    #[error("function call arguments are not valid JSON: {0}")]
    MalformedArguments(#[source] serde_json::Error),
}

/// The two model capabilities the interview needs.
///
/// `complete` turns a prompt into free text. `extract` fills the given JSON
/// schema from a passage and returns whatever object the model produced.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    async fn extract(&self, text: &str, schema: &Value) -> Result<Value, LlmError>;
}

// Structures matching the chat-completions endpoint
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<Vec<FunctionSpec<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<Value>,
}

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize, Debug)]
struct FunctionSpec<'a> {
    name: &'static str,
    description: &'static str,
    parameters: &'a Value,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize, Debug)]
struct FunctionCall {
    #[allow(dead_code)]
    name: String,
    arguments: String,
}

/// Prompt wrapped around the passage for tagging calls.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the desired information from the following passage.\n\n\
        Only extract the properties mentioned in the '{}' function.\n\n\
        Passage:\n{}",
        EXTRACTION_FUNCTION_NAME, text
    )
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    client: Client,
    config: Config,
}

impl OpenAiClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<ResponseMessage, LlmError> {
        let url = self.endpoint();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| LlmError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Chat completion request failed");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(LlmError::Decode)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(LlmError::NoChoices)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(?prompt, "Sending completion prompt");

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            functions: None,
            function_call: None,
        };

        let message = self.send(&request).await?;
        let content = message.content.ok_or(LlmError::MissingField("message content"))?;

        debug!(response = ?content, "Received completion");
        Ok(content.trim().to_string())
    }

    #[instrument(skip(self, text, schema), fields(model = %self.config.model))]
    async fn extract(&self, text: &str, schema: &Value) -> Result<Value, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: extraction_prompt(text),
            }],
            temperature: self.config.temperature,
            functions: Some(vec![FunctionSpec {
                name: EXTRACTION_FUNCTION_NAME,
                description: "Extracts the relevant information from the passage.",
                parameters: schema,
            }]),
            function_call: Some(serde_json::json!({ "name": EXTRACTION_FUNCTION_NAME })),
        };

        let message = self.send(&request).await?;
        let call = message
            .function_call
            .ok_or(LlmError::MissingField("function call"))?;

        debug!(arguments = %call.arguments, "Received extraction arguments");
        serde_json::from_str(&call.arguments).map_err(LlmError::MalformedArguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_names_function_and_passage() {
        let prompt = extraction_prompt("My name is Alex");
        assert!(prompt.contains("'information_extraction'"));
        assert!(prompt.ends_with("Passage:\nMy name is Alex"));
    }

    #[test]
    fn test_completion_request_omits_function_fields() {
        let request = ChatRequest {
            model: "gpt-test",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".to_string(),
            }],
            temperature: 0.0,
            functions: None,
            function_call: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("functions").is_none());
        assert!(json.get("function_call").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_with_function_call_parses() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": {"name": "information_extraction", "arguments": "{\"full_name\": \"Alex\"}"}
                }
            }]
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        let call = response.choices[0].message.function_call.as_ref().unwrap();
        assert_eq!(call.arguments, "{\"full_name\": \"Alex\"}");
        assert!(response.choices[0].message.content.is_none());
    }
}
