//! Event and utterance types for the segmentation engine.
//!
//! Defines the data structures that flow between the voice gateway,
//! the segmenter, and the assistant pipeline.

use serde::{Deserialize, Serialize};

/// Opaque speaker identifier supplied by the voice gateway.
pub type SpeakerId = String;

/// Discrete signals and frames delivered per speaker by the gateway.
///
/// Within a single speaker, events arrive in order; no ordering is assumed
/// across speakers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// The speaker started (or resumed) talking.
    SpeakingStart { speaker: SpeakerId },
    /// A raw audio frame from the speaker's stream.
    Frame { speaker: SpeakerId, data: Vec<u8> },
    /// The platform signaled that the speaker stopped talking.
    SpeakingEnd { speaker: SpeakerId },
    /// The speaker's frame stream closed.
    StreamEnd { speaker: SpeakerId },
}

impl VoiceEvent {
    /// Returns the speaker this event belongs to.
    pub fn speaker(&self) -> &SpeakerId {
        match self {
            VoiceEvent::SpeakingStart { speaker }
            | VoiceEvent::Frame { speaker, .. }
            | VoiceEvent::SpeakingEnd { speaker }
            | VoiceEvent::StreamEnd { speaker } => speaker,
        }
    }

    /// Returns true if this is an audio frame.
    pub fn is_frame(&self) -> bool {
        matches!(self, VoiceEvent::Frame { .. })
    }
}

/// One complete captured speech segment, finalized and immutable.
///
/// Ownership transfers to the consumer on handoff; the segmenter keeps no
/// reference to the buffer after finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Speaker the utterance was captured from.
    pub speaker: SpeakerId,
    /// Captured audio bytes, in arrival order.
    pub audio: Vec<u8>,
    /// Number of frames appended to the buffer.
    pub frames: usize,
}

impl Utterance {
    /// Returns the captured audio size in bytes.
    pub fn len(&self) -> usize {
        self.audio.len()
    }

    /// Returns true if no audio was captured before finalize.
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
