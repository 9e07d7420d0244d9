//! Voice-session segmentation.
//!
//! Converts a per-speaker stream of frames and start/stop signals into
//! discrete finalized utterances using a silence-timeout policy.

pub mod engine;
pub mod event;
pub mod replay;
mod session;

pub use engine::{SegmenterConfig, SegmenterStation};
pub use event::{SpeakerId, Utterance, VoiceEvent};
