// Deterministic stand-in for the language model.

use async_trait::async_trait;
use interviewer::llm::{LanguageModel, LlmError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedModel {
    extractions: Mutex<VecDeque<Result<Value, String>>>,
    prompts: Mutex<Vec<String>>,
    passages: Mutex<Vec<String>>,
    fail_completions: bool,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `complete` call fails with a server error.
    pub fn failing_completions() -> Self {
        Self {
            fail_completions: true,
            ..Self::default()
        }
    }

    /// Queue the next tagging result.
    pub fn then_extract(self, value: Value) -> Self {
        self.extractions.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Queue a tagging failure.
    pub fn then_fail_extract(self, body: &str) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(Err(body.to_string()));
        self
    }

    pub fn completion_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn extracted_passages(&self) -> Vec<String> {
        self.passages.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if self.fail_completions {
            return Err(LlmError::Api {
                status: 500,
                body: "completion unavailable".to_string(),
            });
        }
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        Ok(format!("  Question {}?  ", prompts.len()))
    }

    async fn extract(&self, text: &str, _schema: &Value) -> Result<Value, LlmError> {
        self.passages.lock().unwrap().push(text.to_string());
        match self.extractions.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(body)) => Err(LlmError::Api { status: 502, body }),
            None => Ok(serde_json::json!({})),
        }
    }
}
