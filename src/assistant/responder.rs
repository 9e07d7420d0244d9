//! Response-generation provider seam.

use crate::config::ResponseConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use serde_json::json;

/// Trait for generating an assistant reply to a transcribed utterance.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generate a reply to the given text.
    async fn respond(&self, text: &str) -> Result<String>;

    /// Name of the model in use.
    fn model_name(&self) -> &str;
}

/// Responder backed by a Gemini-style generateContent endpoint.
pub struct GeminiResponder {
    client: reqwest::Client,
    config: ResponseConfig,
}

impl GeminiResponder {
    pub fn new(config: ResponseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Pulls the first candidate's text out of a generateContent response.
    fn extract_text(body: &serde_json::Value) -> Option<String> {
        body.get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(|s| s.to_string())
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn respond(&self, text: &str) -> Result<String> {
        let request = json!({
            "contents": [{ "parts": [{ "text": text }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BridgeError::Response {
                message: format!("provider returned {}", response.status()),
            });
        }

        let body: serde_json::Value = response.json().await?;
        Self::extract_text(&body).ok_or_else(|| BridgeError::Response {
            message: "no candidate text in response".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Mock responder for testing
#[derive(Debug, Clone)]
pub struct MockResponder {
    model_name: String,
    response: String,
    should_fail: bool,
}

impl MockResponder {
    /// Create a new mock responder with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock reply".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific reply
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on respond
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, _text: &str) -> Result<String> {
        if self.should_fail {
            Err(BridgeError::Response {
                message: "mock response failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
