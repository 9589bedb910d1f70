//! Text-to-speech: backend trait, options and the speech synthesizer.

pub mod google;
mod tokenizer;

pub use google::GoogleTranslateTts;

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::audio::new_mp3_path;
use crate::sentiment;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("HTTP error: {status} from speech service")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Speech service returned no audio for segment {0}")]
    EmptyAudio(usize),

    #[error("Failed to render silence: {0}")]
    Silence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for speech synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct TtsOptions {
    /// Language code, e.g. "en"
    pub language: String,
    /// Slower speaking speed
    pub slow: bool,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            slow: false,
        }
    }
}

impl TtsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }
}

/// TTS backend trait - every speech service implements this.
#[async_trait]
pub trait TtsBackend: Send + Sync {
    /// Synthesize `text` into an MP3 file at `output_path`.
    async fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        options: &TtsOptions,
    ) -> Result<(), TtsError>;

    /// Backend name for display
    fn name(&self) -> &str;
}

/// A synthesized speech file plus what was decided about its delivery.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechTrack {
    pub path: PathBuf,
    /// Polarity of the text, when sentiment adjustment was requested
    pub sentiment: Option<f64>,
    /// Speech rate derived from the polarity. Reported only: no backend
    /// parameter consumes it yet.
    pub nominal_speech_rate: Option<f32>,
}

/// Turns a whole document into one speech file.
pub struct SpeechSynthesizer {
    backend: Arc<dyn TtsBackend>,
    options: TtsOptions,
}

impl SpeechSynthesizer {
    pub fn new(backend: Arc<dyn TtsBackend>, options: TtsOptions) -> Self {
        Self { backend, options }
    }

    /// Synthesize `text` in a single backend call into a new MP3 in `dir`.
    ///
    /// With `sentiment_adjustment`, the text's polarity and a nominal speech
    /// rate are computed and returned, but synthesis always runs with the
    /// configured options.
    pub async fn synthesize(
        &self,
        text: &str,
        sentiment_adjustment: bool,
        dir: &Path,
    ) -> Result<SpeechTrack, TtsError> {
        let (sentiment, nominal_speech_rate) = if sentiment_adjustment {
            let score = sentiment::polarity(text);
            let rate = sentiment::speech_rate_for(score);
            log::info!(
                "sentiment polarity {:.3}, nominal speech rate {} (not applied)",
                score,
                rate
            );
            (Some(score), Some(rate))
        } else {
            (None, None)
        };

        let path = new_mp3_path(dir, "speech-")?;
        log::info!(
            "synthesizing {} characters with {} ({})",
            text.chars().count(),
            self.backend.name(),
            self.options.language
        );
        self.backend.synthesize(text, &path, &self.options).await?;

        Ok(SpeechTrack {
            path,
            sentiment,
            nominal_speech_rate,
        })
    }
}
