//! Segmentation engine station.
//!
//! Consumes per-speaker voice events and emits finalized utterances:
//! - a silence-sized frame arms a 5s timer; firing finalizes the utterance
//! - `SpeakingEnd` re-arms the timer; firing finalizes
//! - `StreamEnd` finalizes immediately, bypassing the timer
//!
//! All sessions are owned by one task; events and timer fires are serialized
//! through the run loop, so cancel-and-rearm is atomic with respect to other
//! callbacks. Timer fires carry the epoch they were armed with and are
//! dropped when the session has since finalized through another path.

use crate::config::SegmenterSettings;
use crate::defaults;
use crate::segment::event::{SpeakerId, Utterance, VoiceEvent};
use crate::segment::session::SpeakerSession;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

/// Configuration for the segmentation engine.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// How long after a silence indicator before the utterance is finalized.
    pub silence_timeout: Duration,
    /// Frames under this many bytes count as silence indicators.
    pub silence_chunk_bytes: usize,
    /// Optional cap on utterance size; exceeding it finalizes immediately.
    pub max_utterance_bytes: Option<usize>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_timeout: Duration::from_millis(defaults::SILENCE_TIMEOUT_MS),
            silence_chunk_bytes: defaults::SILENCE_CHUNK_BYTES,
            max_utterance_bytes: None,
        }
    }
}

impl SegmenterConfig {
    /// Creates engine configuration from app config settings.
    pub fn from_settings(settings: &SegmenterSettings) -> Self {
        Self {
            silence_timeout: Duration::from_millis(settings.silence_timeout_ms),
            silence_chunk_bytes: settings.silence_chunk_bytes,
            max_utterance_bytes: if settings.max_utterance_bytes == 0 {
                None
            } else {
                Some(settings.max_utterance_bytes)
            },
        }
    }
}

/// Message sent by an expired silence timer back into the run loop.
#[derive(Debug)]
struct TimerFired {
    speaker: SpeakerId,
    epoch: u64,
}

/// Segmentation engine that tracks one session per speaker.
pub struct SegmenterStation {
    config: SegmenterConfig,
    sessions: HashMap<SpeakerId, SpeakerSession>,
    timer_tx: mpsc::Sender<TimerFired>,
    timer_rx: mpsc::Receiver<TimerFired>,
}

impl SegmenterStation {
    /// Creates a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    /// Creates a new engine with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        let (timer_tx, timer_rx) = mpsc::channel(defaults::EVENT_BUFFER);
        Self {
            config,
            sessions: HashMap::new(),
            timer_tx,
            timer_rx,
        }
    }

    /// Returns true if an utterance is being captured for the speaker.
    pub fn is_capturing(&self, speaker: &str) -> bool {
        self.sessions
            .get(speaker)
            .is_some_and(|s| s.is_speaking())
    }

    /// Runs the engine until the event channel closes.
    ///
    /// Receives voice events, maintains per-speaker sessions, and sends
    /// finalized utterances downstream. Handoff does not wait for the
    /// consumer to process the utterance. When the event channel closes,
    /// armed silence timers are still allowed to fire before the loop exits,
    /// so an utterance pending its timeout is not dropped.
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<VoiceEvent>,
        output: mpsc::Sender<Utterance>,
    ) {
        loop {
            tokio::select! {
                event = input.recv() => match event {
                    Some(event) => {
                        if self.handle_event(event, &output).await.is_err() {
                            return;
                        }
                    }
                    None => break,
                },
                Some(fired) = self.timer_rx.recv() => {
                    if self.handle_timer(fired, &output).await.is_err() {
                        return;
                    }
                }
            }
        }

        // Input closed: drain timers that are still armed. Every armed timer
        // either fires or was already replaced, so this terminates.
        while self.sessions.values().any(|s| s.has_timer()) {
            match self.timer_rx.recv().await {
                Some(fired) => {
                    if self.handle_timer(fired, &output).await.is_err() {
                        return;
                    }
                }
                None => return,
            }
        }
    }

    /// Applies one gateway event to its speaker's session.
    async fn handle_event(
        &mut self,
        event: VoiceEvent,
        output: &mpsc::Sender<Utterance>,
    ) -> Result<(), SendError<Utterance>> {
        match event {
            VoiceEvent::SpeakingStart { speaker } => {
                self.sessions.entry(speaker).or_default().begin();
            }
            VoiceEvent::Frame { speaker, data } => {
                let session = self.sessions.entry(speaker.clone()).or_default();
                session.append(&data);

                let over_cap = self
                    .config
                    .max_utterance_bytes
                    .is_some_and(|cap| session.buffered_bytes() >= cap);
                if over_cap {
                    self.finalize(&speaker, output).await?;
                } else if data.len() < self.config.silence_chunk_bytes {
                    // Silence indicator: replace any pending timer. Larger
                    // frames are appended but never touch an in-flight timer.
                    self.arm_timer(&speaker);
                }
            }
            VoiceEvent::SpeakingEnd { speaker } => {
                if self.is_capturing(&speaker) {
                    self.arm_timer(&speaker);
                }
            }
            VoiceEvent::StreamEnd { speaker } => {
                if self.is_capturing(&speaker) {
                    self.finalize(&speaker, output).await?;
                }
            }
        }
        Ok(())
    }

    /// Handles an expired silence timer.
    ///
    /// A fire is acted on only if the session is still capturing the same
    /// utterance the timer was armed against; anything else is a stale timer
    /// whose session already finalized through another path.
    async fn handle_timer(
        &mut self,
        fired: TimerFired,
        output: &mpsc::Sender<Utterance>,
    ) -> Result<(), SendError<Utterance>> {
        let live = self
            .sessions
            .get(&fired.speaker)
            .is_some_and(|s| s.is_live(fired.epoch));
        if live {
            self.finalize(&fired.speaker, output).await?;
        }
        Ok(())
    }

    /// Arms a fresh silence timer for the speaker, canceling any prior one.
    fn arm_timer(&mut self, speaker: &SpeakerId) {
        let Some(session) = self.sessions.get_mut(speaker) else {
            return;
        };
        let epoch = session.advance_epoch();
        let timeout = self.config.silence_timeout;
        let timer_tx = self.timer_tx.clone();
        let timer_speaker = speaker.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = timer_tx
                .send(TimerFired {
                    speaker: timer_speaker,
                    epoch,
                })
                .await;
        });
        session.arm(timer);
    }

    /// Closes the speaker's utterance and hands it downstream.
    async fn finalize(
        &mut self,
        speaker: &SpeakerId,
        output: &mpsc::Sender<Utterance>,
    ) -> Result<(), SendError<Utterance>> {
        let Some(session) = self.sessions.get_mut(speaker) else {
            return Ok(());
        };
        let (audio, frames) = session.finalize();
        output
            .send(Utterance {
                speaker: speaker.clone(),
                audio,
                frames,
            })
            .await
    }
}

impl Default for SegmenterStation {
    fn default() -> Self {
        Self::new()
    }
}
