use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use voicebridge::assistant::{
    AssistantPipeline, CollectorPlayer, CommandPlayer, ConsumerStation, GeminiResponder,
    MockResponder, MockSynthesizer, MockTranscriber, TranslateTtsSynthesizer, UtteranceConsumer,
    WhisperApiTranscriber,
};
use voicebridge::cli::{Cli, Commands};
use voicebridge::config::Config;
use voicebridge::segment::replay::Script;
use voicebridge::segment::{SegmenterConfig, SegmenterStation};
use voicebridge::{defaults, BridgeError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            offline,
            silence_timeout,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_replay(config, &script, offline, silence_timeout, cli.quiet).await?;
        }
        Commands::Sample => {
            print!("{}", Script::sample().to_jsonl()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

fn load_script(path: &Path) -> Result<Script> {
    let script = if path == Path::new("-") {
        Script::load(BufReader::new(std::io::stdin().lock()))?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        Script::load(BufReader::new(file))?
    };
    if script.is_empty() {
        anyhow::bail!("script {} contains no events", path.display());
    }
    Ok(script)
}

fn build_consumer(config: &Config, offline: bool, quiet: bool) -> Result<Arc<dyn UtteranceConsumer>> {
    let pipeline = if offline {
        AssistantPipeline::new(
            Arc::new(MockTranscriber::new("mock").with_response("(transcribed audio)")),
            Arc::new(MockResponder::new("mock").with_response("(assistant reply)")),
            Arc::new(MockSynthesizer::new()),
            Arc::new(CollectorPlayer::new()),
        )
    } else {
        if config.transcription.api_key.is_empty() {
            return Err(BridgeError::ConfigInvalidValue {
                key: "transcription.api_key".to_string(),
                message: "required for live replay (or pass --offline)".to_string(),
            }
            .into());
        }
        AssistantPipeline::new(
            Arc::new(WhisperApiTranscriber::new(config.transcription.clone())),
            Arc::new(GeminiResponder::new(config.response.clone())),
            Arc::new(TranslateTtsSynthesizer::new(config.speech.clone())),
            Arc::new(CommandPlayer::new(&config.speech)),
        )
    };
    Ok(Arc::new(pipeline.with_quiet(quiet)))
}

async fn run_replay(
    config: Config,
    script_path: &Path,
    offline: bool,
    silence_timeout: Option<Duration>,
    quiet: bool,
) -> Result<()> {
    let script = load_script(script_path)?;
    let consumer = build_consumer(&config, offline, quiet)?;

    let mut segmenter_config = SegmenterConfig::from_settings(&config.segmenter);
    if let Some(timeout) = silence_timeout {
        segmenter_config.silence_timeout = timeout;
    }

    let (event_tx, event_rx) = mpsc::channel(defaults::EVENT_BUFFER);
    let (utterance_tx, utterance_rx) = mpsc::channel(config.segmenter.utterance_buffer.max(1));

    let segmenter = SegmenterStation::with_config(segmenter_config);
    let consumer_station = ConsumerStation::new(consumer);

    let segmenter_task = tokio::spawn(segmenter.run(event_rx, utterance_tx));
    let consumer_task = tokio::spawn(consumer_station.run(utterance_rx));

    script.replay(event_tx).await;
    // Dropping the event sender lets the stations drain and exit.

    segmenter_task.await.context("segmenter task failed")?;
    consumer_task.await.context("consumer task failed")?;

    if !quiet {
        eprintln!("voicebridge: replay complete");
    }
    Ok(())
}
