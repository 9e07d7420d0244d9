//! Scripted event replay.
//!
//! Feeds timed voice events into the segmenter from a JSONL script, for
//! local runs and end-to-end tests without a live voice gateway. One event
//! per line:
//!
//! ```text
//! {"at_ms":0,"type":"speaking_start","speaker":"alice"}
//! {"at_ms":100,"type":"frame","speaker":"alice","data":[1,2,3,4]}
//! {"at_ms":200,"type":"frame","speaker":"alice","data":[0]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::error::{BridgeError, Result};
use crate::segment::event::VoiceEvent;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;

/// One scheduled event: fire `event` at `at_ms` from replay start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Offset from replay start in milliseconds.
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: VoiceEvent,
}

/// An ordered sequence of scheduled voice events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    events: Vec<ScriptEvent>,
}

impl Script {
    /// Builds a script from events, ordering them by offset.
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by_key(|e| e.at_ms);
        Self { events }
    }

    /// Parses a JSONL script from a reader.
    pub fn load(reader: impl BufRead) -> Result<Self> {
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event: ScriptEvent =
                serde_json::from_str(trimmed).map_err(|e| BridgeError::Script {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            events.push(event);
        }
        Ok(Self::new(events))
    }

    /// Serializes the script to JSONL.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Scheduled events in firing order.
    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// A small demo conversation: one utterance closed by silence, one by
    /// stream end.
    pub fn sample() -> Self {
        let speaker = "alice".to_string();
        Self::new(vec![
            ScriptEvent {
                at_ms: 0,
                event: VoiceEvent::SpeakingStart {
                    speaker: speaker.clone(),
                },
            },
            ScriptEvent {
                at_ms: 100,
                event: VoiceEvent::Frame {
                    speaker: speaker.clone(),
                    data: vec![10, 20, 30, 40, 50],
                },
            },
            ScriptEvent {
                at_ms: 600,
                event: VoiceEvent::Frame {
                    speaker: speaker.clone(),
                    data: vec![60, 70, 80],
                },
            },
            ScriptEvent {
                at_ms: 1100,
                event: VoiceEvent::Frame {
                    speaker: speaker.clone(),
                    data: vec![0],
                },
            },
            ScriptEvent {
                at_ms: 7000,
                event: VoiceEvent::SpeakingStart {
                    speaker: speaker.clone(),
                },
            },
            ScriptEvent {
                at_ms: 7100,
                event: VoiceEvent::Frame {
                    speaker: speaker.clone(),
                    data: vec![90, 91, 92, 93],
                },
            },
            ScriptEvent {
                at_ms: 7500,
                event: VoiceEvent::StreamEnd { speaker },
            },
        ])
    }

    /// Replays the script into the event channel on schedule.
    ///
    /// Returns when every event has been sent, or early if the receiver is
    /// dropped.
    pub async fn replay(self, tx: mpsc::Sender<VoiceEvent>) {
        let mut elapsed_ms = 0u64;
        for scheduled in self.events {
            if scheduled.at_ms > elapsed_ms {
                tokio::time::sleep(Duration::from_millis(scheduled.at_ms - elapsed_ms)).await;
                elapsed_ms = scheduled.at_ms;
            }
            if tx.send(scheduled.event).await.is_err() {
                break;
            }
        }
    }
}
