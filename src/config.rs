use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterSettings,
    pub transcription: TranscriptionConfig,
    pub response: ResponseConfig,
    pub speech: SpeechConfig,
}

/// Segmentation policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterSettings {
    /// Silence timeout in milliseconds before finalizing an utterance.
    pub silence_timeout_ms: u64,
    /// Frames under this many bytes count as silence indicators.
    pub silence_chunk_bytes: usize,
    /// Optional cap on utterance size in bytes; 0 disables the cap.
    pub max_utterance_bytes: usize,
    /// Buffer size of the finalized-utterance channel.
    pub utterance_buffer: usize,
}

/// Transcription provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub language: String,
}

/// Response-generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

/// Speech synthesis and playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub api_url: String,
    pub language: String,
    /// External player command; the audio file path is appended as the last argument.
    pub player_command: String,
    pub player_args: Vec<String>,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            silence_timeout_ms: defaults::SILENCE_TIMEOUT_MS,
            silence_chunk_bytes: defaults::SILENCE_CHUNK_BYTES,
            max_utterance_bytes: 0,
            utterance_buffer: defaults::UTTERANCE_BUFFER,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::TRANSCRIPTION_URL.to_string(),
            api_key: String::new(),
            model: defaults::TRANSCRIPTION_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::RESPONSE_URL.to_string(),
            api_key: String::new(),
            model: defaults::RESPONSE_MODEL.to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::SYNTHESIS_URL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            player_command: defaults::PLAYER_COMMAND.to_string(),
            player_args: defaults::PLAYER_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Propagates errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOICEBRIDGE_OPENAI_API_KEY → transcription.api_key
    /// - VOICEBRIDGE_GEMINI_API_KEY → response.api_key
    /// - VOICEBRIDGE_LANGUAGE → transcription.language and speech.language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("VOICEBRIDGE_OPENAI_API_KEY") {
            if !key.is_empty() {
                self.transcription.api_key = key;
            }
        }

        if let Ok(key) = std::env::var("VOICEBRIDGE_GEMINI_API_KEY") {
            if !key.is_empty() {
                self.response.api_key = key;
            }
        }

        if let Ok(language) = std::env::var("VOICEBRIDGE_LANGUAGE") {
            if !language.is_empty() {
                self.transcription.language = language.clone();
                self.speech.language = language;
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voicebridge/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voicebridge")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_voicebridge_env() {
        std::env::remove_var("VOICEBRIDGE_OPENAI_API_KEY");
        std::env::remove_var("VOICEBRIDGE_GEMINI_API_KEY");
        std::env::remove_var("VOICEBRIDGE_LANGUAGE");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.segmenter.silence_timeout_ms, 5000);
        assert_eq!(config.segmenter.silence_chunk_bytes, 3);
        assert_eq!(config.segmenter.max_utterance_bytes, 0);
        assert_eq!(config.transcription.model, "whisper-1");
        assert_eq!(config.response.model, "gemini-1.5-flash");
        assert_eq!(config.speech.player_command, "ffplay");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[segmenter]
silence_timeout_ms = 3000
silence_chunk_bytes = 5
max_utterance_bytes = 1048576

[transcription]
api_key = "sk-test"
language = "tr"

[response]
model = "gemini-1.5-pro"

[speech]
language = "tr"
player_command = "mpv"
player_args = ["--no-video"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.segmenter.silence_timeout_ms, 3000);
        assert_eq!(config.segmenter.silence_chunk_bytes, 5);
        assert_eq!(config.segmenter.max_utterance_bytes, 1048576);
        assert_eq!(config.transcription.api_key, "sk-test");
        assert_eq!(config.transcription.language, "tr");
        assert_eq!(config.response.model, "gemini-1.5-pro");
        assert_eq!(config.speech.player_command, "mpv");
        assert_eq!(config.speech.player_args, vec!["--no-video".to_string()]);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[segmenter]
silence_timeout_ms = 2500
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.segmenter.silence_timeout_ms, 2500);
        // Untouched fields fall back to defaults
        assert_eq!(config.segmenter.silence_chunk_bytes, 3);
        assert_eq!(config.transcription.model, "whisper-1");
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not [ valid toml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/voicebridge.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_invalid_toml_propagates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "segmenter = 7").unwrap();

        assert!(Config::load_or_default(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_voicebridge_env();

        std::env::set_var("VOICEBRIDGE_OPENAI_API_KEY", "sk-env");
        std::env::set_var("VOICEBRIDGE_GEMINI_API_KEY", "gm-env");
        std::env::set_var("VOICEBRIDGE_LANGUAGE", "tr");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.transcription.api_key, "sk-env");
        assert_eq!(config.response.api_key, "gm-env");
        assert_eq!(config.transcription.language, "tr");
        assert_eq!(config.speech.language, "tr");

        clear_voicebridge_env();
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_voicebridge_env();

        std::env::set_var("VOICEBRIDGE_LANGUAGE", "");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.transcription.language, "en");
        assert_eq!(config.speech.language, "en");

        clear_voicebridge_env();
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        assert!(path.ends_with("voicebridge/config.toml"));
    }
}
