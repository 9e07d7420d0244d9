//! Text-to-speech provider seam.

use crate::config::SpeechConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;

/// Trait for synthesizing spoken audio from reply text.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize audio (MP3 bytes) for the given text.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Synthesizer backed by a translate-TTS style endpoint.
///
/// A GET with the text and language as query parameters returns MP3 bytes.
pub struct TranslateTtsSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl TranslateTtsSynthesizer {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Synthesizer for TranslateTtsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.config.language.as_str()),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BridgeError::Synthesis {
                message: format!("provider returned {}", response.status()),
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(BridgeError::Synthesis {
                message: "provider returned empty audio".to_string(),
            });
        }
        Ok(audio.to_vec())
    }
}

/// Mock synthesizer for testing
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    audio: Vec<u8>,
    should_fail: bool,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer returning fixed audio bytes
    pub fn new() -> Self {
        Self {
            audio: b"mock-mp3-audio".to_vec(),
            should_fail: false,
        }
    }

    /// Configure the audio bytes the mock returns
    pub fn with_audio(mut self, audio: &[u8]) -> Self {
        self.audio = audio.to_vec();
        self
    }

    /// Configure the mock to fail on synthesize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        if self.should_fail {
            Err(BridgeError::Synthesis {
                message: "mock synthesis failure".to_string(),
            })
        } else {
            Ok(self.audio.clone())
        }
    }
}
