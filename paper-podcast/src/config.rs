//! paper-podcast configuration management.

use anyhow::Result;
use llm_client::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::summarize::SummaryOptions;
use crate::text::chunker::DEFAULT_MAX_CHUNK_WORDS;
use crate::tts::TtsOptions;

const DEFAULT_MIN_CHUNK_WORDS: usize = 5;
const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 150;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastConfig {
    /// Words per summarization chunk
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,

    /// Chunks with fewer words than this are not summarized
    #[serde(default = "default_min_chunk_words")]
    pub min_chunk_words: usize,

    /// Completion length limit per chunk
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Sampling temperature for summaries (low = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Summary requests in flight at once (1 = one after another)
    #[serde(default = "default_concurrency")]
    pub summarize_concurrency: usize,

    /// Speech language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Slow speech
    #[serde(default)]
    pub slow: bool,

    /// Timeout for each speech request, in seconds. None waits indefinitely.
    #[serde(default)]
    pub tts_timeout_secs: Option<u64>,

    /// Speech service URL. None uses the public translate_tts endpoint.
    #[serde(default)]
    pub tts_endpoint: Option<String>,

    /// FFmpeg executable. None uses `ffmpeg` from PATH.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// FFprobe executable. None uses `ffprobe` from PATH.
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Summarization provider settings
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_chunk_words() -> usize {
    DEFAULT_MAX_CHUNK_WORDS
}

fn default_min_chunk_words() -> usize {
    DEFAULT_MIN_CHUNK_WORDS
}

fn default_summary_max_tokens() -> u32 {
    DEFAULT_SUMMARY_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_concurrency() -> usize {
    1
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            chunk_words: default_chunk_words(),
            min_chunk_words: default_min_chunk_words(),
            summary_max_tokens: default_summary_max_tokens(),
            temperature: default_temperature(),
            summarize_concurrency: default_concurrency(),
            language: default_language(),
            slow: false,
            tts_timeout_secs: None,
            tts_endpoint: None,
            ffmpeg_path: None,
            ffprobe_path: None,
            llm: LlmConfig::default(),
        }
    }
}

impl PodcastConfig {
    /// Get the config file path: ~/.config/cli-programs/paper-podcast.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("paper-podcast.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: PodcastConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            max_chunk_words: self.chunk_words.max(1),
            min_chunk_words: self.min_chunk_words,
            max_tokens: self.summary_max_tokens,
            temperature: self.temperature,
            concurrency: self.summarize_concurrency.max(1),
            ..SummaryOptions::default()
        }
    }

    pub fn tts_options(&self) -> TtsOptions {
        TtsOptions::new()
            .with_language(&self.language)
            .with_slow(self.slow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PodcastConfig::default();
        assert_eq!(config.chunk_words, 512);
        assert_eq!(config.min_chunk_words, 5);
        assert_eq!(config.summary_max_tokens, 150);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.summarize_concurrency, 1);
        assert_eq!(config.language, "en");
        assert!(!config.slow);
        assert!(config.ffmpeg_path.is_none());
        assert!(config.tts_endpoint.is_none());
        assert_eq!(config.llm.provider, "groq");
    }

    #[test]
    fn test_config_path() {
        let path = PodcastConfig::config_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.ends_with("cli-programs/paper-podcast.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
chunk_words = 256
summarize_concurrency = 4
tts_endpoint = "http://localhost:8080/translate_tts"
ffmpeg_path = "C:/FFmpeg/ffmpeg.exe"

[llm]
provider = "openrouter"
model = "meta-llama/llama-3.1-70b-instruct"
timeout_secs = 60
"#;
        let config: PodcastConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chunk_words, 256);
        assert_eq!(config.summarize_concurrency, 4);
        assert_eq!(
            config.tts_endpoint.as_deref(),
            Some("http://localhost:8080/translate_tts")
        );
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("C:/FFmpeg/ffmpeg.exe")));
        assert_eq!(config.llm.provider, "openrouter");
        assert_eq!(config.llm.timeout_secs, Some(60));
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: PodcastConfig = toml::from_str("").unwrap();
        assert_eq!(config.chunk_words, 512);
        assert_eq!(config.summary_max_tokens, 150);
        assert_eq!(config.llm.model, "llama-3.1-70b-versatile");
    }

    #[test]
    fn test_summary_options_clamp_zero_values() {
        let config = PodcastConfig {
            chunk_words: 0,
            summarize_concurrency: 0,
            ..PodcastConfig::default()
        };
        let options = config.summary_options();
        assert_eq!(options.max_chunk_words, 1);
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.max_tokens, 150);
    }

    #[test]
    fn test_tts_options_from_config() {
        let config = PodcastConfig {
            language: "fr".into(),
            slow: true,
            ..PodcastConfig::default()
        };
        let options = config.tts_options();
        assert_eq!(options.language, "fr");
        assert!(options.slow);
    }
}
