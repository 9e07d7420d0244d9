//! Default configuration constants for voicebridge.
//!
//! Shared constants used across configuration types to keep the segmentation
//! policy and provider settings consistent in one place.

/// Silence timeout in milliseconds before an utterance is finalized.
///
/// Once a silence-sized chunk (or an end-of-speech signal) arrives, the
/// session waits this long for further activity before cutting the buffer.
pub const SILENCE_TIMEOUT_MS: u64 = 5000;

/// Frames below this many bytes are treated as silence indicators.
///
/// Silence detection is purely size-based: voice gateways emit tiny frames
/// when a speaker goes quiet. Frames of any size are still appended to the
/// utterance buffer.
pub const SILENCE_CHUNK_BYTES: usize = 3;

/// Buffer size of the event channel feeding the segmenter.
pub const EVENT_BUFFER: usize = 64;

/// Buffer size of the finalized-utterance channel.
///
/// The segmenter hands utterances off without waiting for downstream
/// transcription; this buffer absorbs bursts from concurrent speakers.
pub const UTTERANCE_BUFFER: usize = 16;

/// Default transcription endpoint (OpenAI-compatible audio transcription).
pub const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default transcription model name.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default response-generation endpoint base (Gemini-style generateContent).
pub const RESPONSE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default response-generation model name.
pub const RESPONSE_MODEL: &str = "gemini-1.5-flash";

/// Default speech synthesis endpoint (translate-TTS style, returns MP3).
pub const SYNTHESIS_URL: &str = "https://translate.google.com/translate_tts";

/// Default language code for transcription and synthesis.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default playback command. Receives the synthesized audio file path as its
/// final argument.
pub const PLAYER_COMMAND: &str = "ffplay";

/// Default playback command arguments.
pub const PLAYER_ARGS: &[&str] = &["-autoexit", "-nodisp", "-loglevel", "quiet"];
