// SPDX-License-Identifier: MIT

//! Completion collaborator - Groq's OpenAI-compatible chat API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

use crate::flow::error::ScribeError;

/// Default model for the pipeline prompts.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Completion collaborator: one system/user prompt pair in, raw text out.
/// No streaming, no multi-turn memory across calls.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ScribeError>;
}

/// Groq chat-completions client
pub struct GroqModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
    temperature: f64,
}

impl GroqModel {
    /// Create a new GroqModel
    ///
    /// Requires `GROQ_API_KEY` environment variable to be set.
    /// Optionally uses `GROQ_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, ScribeError> {
        let api_key =
            env::var("GROQ_API_KEY").map_err(|_| ScribeError::config("GROQ_API_KEY must be set"))?;
        let base_url = env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
            temperature: 0.2,
        })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model_name,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": self.temperature
        })
    }

    /// Pull the completion text out of a chat-completions response.
    fn parse_response(response: &serde_json::Value) -> Result<String, ScribeError> {
        response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ScribeError::InvalidResponse("no completion content".to_string()))
    }
}

#[async_trait]
impl CompletionModel for GroqModel {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ScribeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(system_prompt, user_prompt);

        log::debug!("Groq request: model={}", self.model_name);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ScribeError::api("Groq", text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        Self::parse_response(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GroqModel {
        GroqModel {
            client: Client::new(),
            api_key: "test-key".to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.2,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = model().request_body("be helpful", "hello");

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_parse_response_text() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Hello, how can I help?" }
            }]
        });

        let text = GroqModel::parse_response(&response).unwrap();
        assert_eq!(text, "Hello, how can I help?");
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        let response = json!({ "choices": [] });
        assert!(GroqModel::parse_response(&response).is_err());
    }
}
