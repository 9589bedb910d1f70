//! Google Translate speech endpoint backend.
//!
//! The endpoint only accepts short inputs, so text is cleaned, split into
//! segments of at most 100 characters and each segment is fetched in order.
//! MP3 frames concatenate cleanly, so the segments are appended into one file.

use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use super::tokenizer::split_for_speech;
use super::{TtsBackend, TtsError, TtsOptions};
use crate::audio::FfmpegTools;
use crate::text::clean_for_speech;

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";
const MAX_SEGMENT_CHARS: usize = 100;
const SLOW_SPEED: &str = "0.24";
const NORMAL_SPEED: &str = "1";
/// Length of the placeholder written when there is nothing to say.
const EMPTY_TEXT_SILENCE_MS: u64 = 1000;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub struct GoogleTranslateTts {
    client: Client,
    endpoint: String,
    ffmpeg: FfmpegTools,
}

impl GoogleTranslateTts {
    /// Create a backend. `ffmpeg` renders silence for empty input.
    pub fn new(ffmpeg: FfmpegTools, timeout: Option<Duration>) -> Result<Self, TtsError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TtsError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: TRANSLATE_TTS_URL.to_string(),
            ffmpeg,
        })
    }

    /// Point the backend at a different endpoint (e.g. a local mirror).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn fetch_segment(
        &self,
        segment: &str,
        idx: usize,
        total: usize,
        options: &TtsOptions,
    ) -> Result<Vec<u8>, TtsError> {
        let query = segment_query(segment, idx, total, options);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .header("Referer", "http://translate.google.com/")
            .send()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio(idx));
        }

        Ok(bytes.to_vec())
    }
}

/// Query parameters for one segment request.
fn segment_query(
    segment: &str,
    idx: usize,
    total: usize,
    options: &TtsOptions,
) -> Vec<(&'static str, String)> {
    let speed = if options.slow { SLOW_SPEED } else { NORMAL_SPEED };
    vec![
        ("ie", "UTF-8".to_string()),
        ("client", "tw-ob".to_string()),
        ("tl", options.language.clone()),
        ("q", segment.to_string()),
        ("ttsspeed", speed.to_string()),
        ("total", total.to_string()),
        ("idx", idx.to_string()),
        ("textlen", segment.chars().count().to_string()),
    ]
}

/// Segments that will be sent for `text`, after cleanup.
fn prepare_segments(text: &str) -> Vec<String> {
    split_for_speech(&clean_for_speech(text), MAX_SEGMENT_CHARS)
}

#[async_trait]
impl TtsBackend for GoogleTranslateTts {
    async fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        options: &TtsOptions,
    ) -> Result<(), TtsError> {
        let segments = prepare_segments(text);

        if segments.is_empty() {
            log::warn!("no speakable text, writing silence instead");
            let ffmpeg = self.ffmpeg.clone();
            let path = output_path.to_path_buf();
            return tokio::task::spawn_blocking(move || {
                ffmpeg.render_silence(&path, EMPTY_TEXT_SILENCE_MS)
            })
            .await
            .map_err(|e| TtsError::Silence(e.to_string()))?
            .map_err(|e| TtsError::Silence(e.to_string()));
        }

        log::debug!("requesting {} speech segments", segments.len());
        let total = segments.len();
        let mut audio = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            let bytes = self.fetch_segment(segment, idx, total, options).await?;
            audio.extend_from_slice(&bytes);
        }

        tokio::fs::write(output_path, &audio).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Google Translate TTS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_segment_query() {
        let options = TtsOptions::default();
        let query = segment_query("Hello world.", 0, 3, &options);

        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("tl"), "en");
        assert_eq!(get("q"), "Hello world.");
        assert_eq!(get("ttsspeed"), "1");
        assert_eq!(get("total"), "3");
        assert_eq!(get("idx"), "0");
        assert_eq!(get("textlen"), "12");
        assert_eq!(get("client"), "tw-ob");
    }

    #[test]
    fn test_slow_speed() {
        let options = TtsOptions::new().with_slow(true);
        let query = segment_query("x", 0, 1, &options);
        assert!(query.contains(&("ttsspeed", "0.24".to_string())));
    }

    #[test]
    fn test_prepare_segments_cleans_and_bounds() {
        let text = "The e\u{fb00}ect was signi\u{fb01}cant.\n".repeat(20);
        let segments = prepare_segments(&text);

        assert!(!segments.is_empty());
        for segment in &segments {
            assert!(segment.chars().count() <= MAX_SEGMENT_CHARS);
            assert!(!segment.contains('\n'));
        }
        assert!(segments[0].starts_with("The effect was significant."));
    }

    #[test]
    fn test_prepare_segments_empty() {
        assert!(prepare_segments("").is_empty());
        assert!(prepare_segments(" \n\t").is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let dir = TempDir::new().unwrap();
        let tools = FfmpegTools::default();
        let backend = GoogleTranslateTts::new(tools, Some(Duration::from_secs(2)))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/translate_tts");

        let result = backend
            .synthesize("Hello.", &dir.path().join("out.mp3"), &TtsOptions::default())
            .await;
        assert!(matches!(result, Err(TtsError::Network(_))));
    }

    #[tokio::test]
    async fn test_empty_text_without_ffmpeg_is_silence_error() {
        let dir = TempDir::new().unwrap();
        let tools = FfmpegTools::new(Some("/nonexistent/ffmpeg".into()), None);
        let backend = GoogleTranslateTts::new(tools, None)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/never-called");

        let result = backend
            .synthesize("  ", &dir.path().join("empty.mp3"), &TtsOptions::default())
            .await;
        assert!(matches!(result, Err(TtsError::Silence(_))));
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_empty_text_renders_silence() {
        let tools = FfmpegTools::default();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.mp3");
        let backend = GoogleTranslateTts::new(tools, None)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/never-called");

        backend
            .synthesize("", &output, &TtsOptions::default())
            .await
            .unwrap();
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
