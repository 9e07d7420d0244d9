//! Assistant side of the bridge: everything that happens to an utterance
//! after the segmenter finalizes it.

pub mod consumer;
pub mod pipeline;
pub mod player;
pub mod responder;
pub mod synthesizer;
pub mod transcriber;

pub use consumer::{CollectorConsumer, ConsumerStation, UtteranceConsumer};
pub use pipeline::AssistantPipeline;
pub use player::{AudioPlayer, CollectorPlayer, CommandPlayer};
pub use responder::{GeminiResponder, MockResponder, Responder};
pub use synthesizer::{MockSynthesizer, Synthesizer, TranslateTtsSynthesizer};
pub use transcriber::{MockTranscriber, Transcriber, WhisperApiTranscriber};
