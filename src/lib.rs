//! voicebridge - voice-session segmentation for conversational voice bots
//!
//! Turns a per-speaker stream of audio frames and start/stop signals into
//! finalized utterances, then runs each one through a transcription →
//! response → synthesis → playback pipeline.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod assistant;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod segment;

// Core segmentation
pub use segment::{SegmenterConfig, SegmenterStation, SpeakerId, Utterance, VoiceEvent};

// Assistant seams (transcription → response → synthesis → playback)
pub use assistant::{
    AssistantPipeline, AudioPlayer, ConsumerStation, Responder, Synthesizer, Transcriber,
    UtteranceConsumer,
};

// Error handling
pub use error::{BridgeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
