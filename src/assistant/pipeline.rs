//! Assistant pipeline: transcription → response → synthesis → playback.
//!
//! One utterance flows through the providers sequentially. The segmenter has
//! already let go of the buffer by the time this runs, so a slow provider
//! never delays capture.

use crate::assistant::consumer::UtteranceConsumer;
use crate::assistant::player::AudioPlayer;
use crate::assistant::responder::Responder;
use crate::assistant::synthesizer::Synthesizer;
use crate::assistant::transcriber::Transcriber;
use crate::error::Result;
use crate::segment::Utterance;
use async_trait::async_trait;
use owo_colors::OwoColorize;
use std::sync::Arc;

/// Conversational pipeline over the provider seams.
pub struct AssistantPipeline {
    transcriber: Arc<dyn Transcriber>,
    responder: Arc<dyn Responder>,
    synthesizer: Arc<dyn Synthesizer>,
    player: Arc<dyn AudioPlayer>,
    quiet: bool,
}

impl AssistantPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        responder: Arc<dyn Responder>,
        synthesizer: Arc<dyn Synthesizer>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            transcriber,
            responder,
            synthesizer,
            player,
            quiet: false,
        }
    }

    /// Suppress transcript/reply output on the terminal.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

#[async_trait]
impl UtteranceConsumer for AssistantPipeline {
    async fn consume(&self, utterance: Utterance) -> Result<()> {
        let speaker = utterance.speaker.clone();

        let transcript = self.transcriber.transcribe(&utterance.audio).await?;
        if !self.quiet {
            eprintln!("{} {}", format!("[{}]", speaker).dimmed(), transcript);
        }

        let reply = self.responder.respond(&transcript).await?;
        if !self.quiet {
            eprintln!("{} {}", "[assistant]".green(), reply);
        }

        let audio = self.synthesizer.synthesize(&reply).await?;
        self.player.play(&audio).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "assistant"
    }
}
