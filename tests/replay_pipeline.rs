//! End-to-end replay tests: script → segmenter → consumer.
//!
//! All tests run on a paused tokio clock, so scripted schedules and silence
//! timeouts resolve deterministically.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use voicebridge::assistant::{
    AssistantPipeline, CollectorConsumer, CollectorPlayer, ConsumerStation, MockResponder,
    MockSynthesizer, MockTranscriber,
};
use voicebridge::segment::replay::{Script, ScriptEvent};
use voicebridge::segment::{SegmenterConfig, SegmenterStation, Utterance, VoiceEvent};

fn start(at_ms: u64, speaker: &str) -> ScriptEvent {
    ScriptEvent {
        at_ms,
        event: VoiceEvent::SpeakingStart {
            speaker: speaker.into(),
        },
    }
}

fn frame(at_ms: u64, speaker: &str, data: &[u8]) -> ScriptEvent {
    ScriptEvent {
        at_ms,
        event: VoiceEvent::Frame {
            speaker: speaker.into(),
            data: data.to_vec(),
        },
    }
}

fn stream_end(at_ms: u64, speaker: &str) -> ScriptEvent {
    ScriptEvent {
        at_ms,
        event: VoiceEvent::StreamEnd {
            speaker: speaker.into(),
        },
    }
}

/// Runs a script through a segmenter and collects every finalized utterance.
async fn segment_script(script: Script, config: SegmenterConfig) -> Vec<Utterance> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let (utterance_tx, mut utterance_rx) = mpsc::channel(16);

    let segmenter = SegmenterStation::with_config(config);
    let segmenter_task = tokio::spawn(segmenter.run(event_rx, utterance_tx));
    let replay_task = tokio::spawn(script.replay(event_tx));

    let mut utterances = Vec::new();
    while let Some(utterance) = utterance_rx.recv().await {
        utterances.push(utterance);
    }

    replay_task.await.unwrap();
    segmenter_task.await.unwrap();
    utterances
}

#[tokio::test(start_paused = true)]
async fn test_sample_script_yields_two_utterances() {
    let utterances = segment_script(Script::sample(), SegmenterConfig::default()).await;

    assert_eq!(utterances.len(), 2);
    // First utterance closes on the silence timeout and keeps every frame,
    // the silence indicator included.
    assert_eq!(utterances[0].speaker, "alice");
    assert_eq!(utterances[0].audio, vec![10, 20, 30, 40, 50, 60, 70, 80, 0]);
    assert_eq!(utterances[0].frames, 3);
    // Second closes on stream end.
    assert_eq!(utterances[1].audio, vec![90, 91, 92, 93]);
}

#[tokio::test(start_paused = true)]
async fn test_interleaved_speakers_segment_independently() {
    let script = Script::new(vec![
        start(0, "alice"),
        start(0, "bob"),
        frame(50, "alice", b"alice-speech"),
        frame(60, "bob", b"bob-speech"),
        // Bob goes quiet; Alice keeps talking through Bob's timeout window.
        frame(100, "bob", &[0]),
        frame(2000, "alice", b"-more"),
        frame(7000, "alice", &[0]),
    ]);

    let utterances = segment_script(script, SegmenterConfig::default()).await;

    assert_eq!(utterances.len(), 2);
    assert_eq!(utterances[0].speaker, "bob");
    assert_eq!(utterances[0].audio, b"bob-speech\0");
    assert_eq!(utterances[1].speaker, "alice");
    assert_eq!(utterances[1].audio, b"alice-speech-more\0");
}

#[tokio::test(start_paused = true)]
async fn test_shorter_silence_timeout_splits_a_pause() {
    let script = Script::new(vec![
        start(0, "alice"),
        frame(10, "alice", b"first"),
        frame(20, "alice", &[0]),
        // With a 1s timeout this gap finalizes; the default 5s would not.
        start(2000, "alice"),
        frame(2010, "alice", b"second"),
        stream_end(2020, "alice"),
    ]);

    let config = SegmenterConfig {
        silence_timeout: Duration::from_secs(1),
        ..SegmenterConfig::default()
    };
    let utterances = segment_script(script, config).await;

    assert_eq!(utterances.len(), 2);
    assert_eq!(utterances[0].audio, b"first\0");
    assert_eq!(utterances[1].audio, b"second");
}

#[tokio::test(start_paused = true)]
async fn test_pending_timer_survives_script_end() {
    // The script ends (sender drops) while a silence timer is still armed;
    // the segmenter must drain that timer before exiting.
    let script = Script::new(vec![
        start(0, "alice"),
        frame(10, "alice", b"tail"),
        frame(20, "alice", &[0]),
    ]);

    let utterances = segment_script(script, SegmenterConfig::default()).await;

    assert_eq!(utterances.len(), 1);
    assert_eq!(utterances[0].audio, b"tail\0");
}

#[tokio::test(start_paused = true)]
async fn test_replay_through_consumer_station_collects_utterances() {
    let collector = CollectorConsumer::new();
    let (event_tx, event_rx) = mpsc::channel(64);
    let (utterance_tx, utterance_rx) = mpsc::channel(16);

    let segmenter_task =
        tokio::spawn(SegmenterStation::with_config(SegmenterConfig::default()).run(event_rx, utterance_tx));
    let consumer_task =
        tokio::spawn(ConsumerStation::new(Arc::new(collector.clone())).run(utterance_rx));

    Script::sample().replay(event_tx).await;
    segmenter_task.await.unwrap();
    consumer_task.await.unwrap();

    // Dispatch tasks may still be in flight right after the station exits.
    for _ in 0..10 {
        if collector.collected().len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }

    let collected = collector.collected();
    assert_eq!(collected.len(), 2);
    assert!(collected.iter().all(|u| u.speaker == "alice"));
}

#[tokio::test(start_paused = true)]
async fn test_full_assistant_chain_plays_one_reply_per_utterance() {
    let player = CollectorPlayer::new();
    let pipeline = AssistantPipeline::new(
        Arc::new(MockTranscriber::new("mock").with_response("hello there")),
        Arc::new(MockResponder::new("mock").with_response("hi!")),
        Arc::new(MockSynthesizer::new().with_audio(b"reply-mp3")),
        Arc::new(player.clone()),
    )
    .with_quiet(true);

    let (event_tx, event_rx) = mpsc::channel(64);
    let (utterance_tx, utterance_rx) = mpsc::channel(16);

    let segmenter_task =
        tokio::spawn(SegmenterStation::with_config(SegmenterConfig::default()).run(event_rx, utterance_tx));
    let consumer_task = tokio::spawn(ConsumerStation::new(Arc::new(pipeline)).run(utterance_rx));

    Script::sample().replay(event_tx).await;
    segmenter_task.await.unwrap();
    consumer_task.await.unwrap();

    for _ in 0..10 {
        if player.played().len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }

    let played = player.played();
    assert_eq!(played.len(), 2);
    assert!(played.iter().all(|audio| audio == b"reply-mp3"));
}
