//! Speech-to-text provider seam.

use crate::config::TranscriptionConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Trait for transcribing a captured utterance to text.
///
/// Allows swapping implementations (hosted API vs mock).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes to text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;

    /// Name of the model in use.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcriber backed by an OpenAI-compatible audio transcription endpoint.
///
/// Sends the raw audio as the request body with the model and language as
/// query parameters, and reads the transcribed text from the JSON response.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    config: TranscriptionConfig,
}

impl WhisperApiTranscriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .query(&[
                ("model", self.config.model.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .body(audio.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BridgeError::Transcription {
                message: format!("provider returned {}", response.status()),
            });
        }

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    response: String,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock transcription".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        if self.should_fail {
            Err(BridgeError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
