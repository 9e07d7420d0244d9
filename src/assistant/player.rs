//! Audio playback through an external player command.
//!
//! The synthesized reply is written to a temp file, handed to the configured
//! player, and deleted once the player exits. Deleting is the player's job:
//! the synthesized artifact must not outlive playback.

use crate::config::SpeechConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

/// Trait for playing synthesized audio back to the channel.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the given audio bytes to completion.
    async fn play(&self, audio: &[u8]) -> Result<()>;
}

/// Player that shells out to an external command (ffplay, mpv, paplay, ...).
pub struct CommandPlayer {
    command: String,
    args: Vec<String>,
    temp_dir: PathBuf,
}

impl CommandPlayer {
    /// Creates a player from speech config, writing temp files to the
    /// system temp directory.
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            command: config.player_command.clone(),
            args: config.player_args.clone(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Overrides the directory temp audio files are written to.
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = dir;
        self
    }

    fn temp_path(&self) -> PathBuf {
        let unique = format!(
            "voicebridge-reply-{}-{}.mp3",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        );
        self.temp_dir.join(unique)
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: &[u8]) -> Result<()> {
        let path = self.temp_path();
        tokio::fs::write(&path, audio).await?;

        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(&path)
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BridgeError::PlayerNotFound {
                        tool: self.command.clone(),
                    }
                } else {
                    BridgeError::Playback {
                        message: format!("failed to run {}: {}", self.command, e),
                    }
                }
            });

        // The temp file is removed whether playback succeeded or not.
        if let Err(e) = tokio::fs::remove_file(&path).await {
            eprintln!(
                "voicebridge: failed to remove temp audio {}: {}",
                path.display(),
                e
            );
        }

        let status = status?;
        if !status.success() {
            return Err(BridgeError::Playback {
                message: format!("{} exited with {}", self.command, status),
            });
        }
        Ok(())
    }
}

/// Player that records played audio for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct CollectorPlayer {
    played: Arc<std::sync::Mutex<Vec<Vec<u8>>>>,
}

impl CollectorPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the audio buffers played so far.
    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AudioPlayer for CollectorPlayer {
    async fn play(&self, audio: &[u8]) -> Result<()> {
        if let Ok(mut played) = self.played.lock() {
            played.push(audio.to_vec());
        }
        Ok(())
    }
}
