//! Utterance consumer seam and dispatch station.
//!
//! The segmenter hands finalized utterances to a channel; the consumer
//! station drains it and dispatches each utterance to an `UtteranceConsumer`
//! in its own task, so one speaker's pipeline never blocks another's capture.

use crate::error::Result;
use crate::segment::Utterance;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Trait for handling a completed utterance.
///
/// Invoked at most once per utterance; the consumer owns the buffer and is
/// responsible for eventually releasing any storage derived from it.
#[async_trait]
pub trait UtteranceConsumer: Send + Sync {
    /// Process one finalized utterance.
    async fn consume(&self, utterance: Utterance) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "consumer"
    }
}

/// Station that drains the utterance channel and dispatches to a consumer.
pub struct ConsumerStation {
    consumer: Arc<dyn UtteranceConsumer>,
}

impl ConsumerStation {
    /// Creates a station around the given consumer.
    pub fn new(consumer: Arc<dyn UtteranceConsumer>) -> Self {
        Self { consumer }
    }

    /// Runs until the utterance channel closes.
    ///
    /// Each utterance is processed in a spawned task; consumer failures are
    /// logged and do not stop the station.
    pub async fn run(self, mut input: mpsc::Receiver<Utterance>) {
        while let Some(utterance) = input.recv().await {
            let consumer = self.consumer.clone();
            tokio::spawn(async move {
                let speaker = utterance.speaker.clone();
                if let Err(e) = consumer.consume(utterance).await {
                    eprintln!(
                        "voicebridge: {} failed for speaker {}: {}",
                        consumer.name(),
                        speaker,
                        e
                    );
                }
            });
        }
    }
}

/// Consumer that collects utterances for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct CollectorConsumer {
    collected: Arc<std::sync::Mutex<Vec<Utterance>>>,
}

impl CollectorConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the utterances consumed so far.
    pub fn collected(&self) -> Vec<Utterance> {
        self.collected.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UtteranceConsumer for CollectorConsumer {
    async fn consume(&self, utterance: Utterance) -> Result<()> {
        if let Ok(mut collected) = self.collected.lock() {
            collected.push(utterance);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}
