//! Orchestrates a run: extract, optionally summarize, synthesize, optionally mix.
//!
//! Extraction and summarization degrade and let the run continue; synthesis
//! and mixing failures abort it. All intermediate files live in a temporary
//! directory owned by the returned [`PodcastOutput`].

pub mod report;
pub mod types;

pub use report::{RunReport, SummaryStats};
pub use types::{PipelineEvent, Stage, StageOutcome, StageStatus};

use std::path::PathBuf;
use tempfile::TempDir;
use thiserror::Error;

use crate::audio::{FfmpegTools, MixError, mix_with_background};
use crate::pdf::{self, ExtractedText};
use crate::summarize::{SummaryReport, Summarizer};
use crate::tts::{SpeechSynthesizer, TtsError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Summarization requested but no summarizer is configured")]
    SummarizerMissing,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("Mixing failed: {0}")]
    Mix(#[from] MixError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct PodcastRequest {
    pub pdf: Vec<u8>,
    pub background: Option<Vec<u8>>,
    pub summarize: bool,
    pub sentiment_adjustment: bool,
}

/// Result of a successful run.
///
/// `audio_path` points into `workdir`; copy it elsewhere before dropping
/// this value.
#[derive(Debug)]
pub struct PodcastOutput {
    pub audio_path: PathBuf,
    pub report: RunReport,
    pub workdir: TempDir,
}

pub struct Pipeline {
    summarizer: Option<Summarizer>,
    synthesizer: SpeechSynthesizer,
    ffmpeg: FfmpegTools,
}

impl Pipeline {
    pub fn new(synthesizer: SpeechSynthesizer, ffmpeg: FfmpegTools) -> Self {
        Self {
            summarizer: None,
            synthesizer,
            ffmpeg,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Run every stage for `request`, reporting progress through `on_event`.
    pub async fn run<F>(
        &self,
        request: PodcastRequest,
        mut on_event: F,
    ) -> Result<PodcastOutput, PipelineError>
    where
        F: FnMut(&PipelineEvent),
    {
        let summarizer = match (request.summarize, &self.summarizer) {
            (true, None) => return Err(PipelineError::SummarizerMissing),
            (true, Some(s)) => Some(s),
            (false, _) => None,
        };

        let workdir = tempfile::Builder::new()
            .prefix("paper-podcast-")
            .tempdir()?;
        log::debug!("working directory {}", workdir.path().display());

        let mut report = RunReport::new();

        on_event(&PipelineEvent::StageStarted(Stage::Extracting));
        let extracted = extract(request.pdf).await?;
        {
            let value = extracted.value();
            report.page_count = value.page_count;
            report.failed_pages = value.failed_pages.clone();
            report.extracted_words = value.word_count();
        }
        finish(&mut report, &mut on_event, Stage::Extracting, extracted.status());
        let mut text = extracted.into_value().text;

        if let Some(summarizer) = summarizer {
            on_event(&PipelineEvent::StageStarted(Stage::Summarizing));
            let summary = summarizer.summarize(&text).await;
            report.summary = Some(SummaryStats::from(&summary));
            let outcome = summary_outcome(summary);
            finish(&mut report, &mut on_event, Stage::Summarizing, outcome.status());
            text = outcome.into_value();
        } else {
            report.record(Stage::Summarizing, StageStatus::Skipped);
        }

        on_event(&PipelineEvent::StageStarted(Stage::Synthesizing));
        report.spoken_words = crate::text::word_count(&text);
        let track = self
            .synthesizer
            .synthesize(&text, request.sentiment_adjustment, workdir.path())
            .await?;
        report.sentiment = track.sentiment;
        report.nominal_speech_rate = track.nominal_speech_rate;
        finish(&mut report, &mut on_event, Stage::Synthesizing, StageStatus::Complete);

        let audio_path = match request.background {
            Some(background) => {
                on_event(&PipelineEvent::StageStarted(Stage::Mixing));
                let tools = self.ffmpeg.clone();
                let speech = track.path.clone();
                let dir = workdir.path().to_path_buf();
                let mixed = tokio::task::spawn_blocking(move || {
                    mix_with_background(&tools, Some(&speech), Some(&background), &dir)
                })
                .await
                .map_err(|e| PipelineError::Task(e.to_string()))??;
                report.background_mixed = true;
                finish(&mut report, &mut on_event, Stage::Mixing, StageStatus::Complete);
                mixed
            }
            None => {
                report.record(Stage::Mixing, StageStatus::Skipped);
                track.path
            }
        };

        report.duration_ms = self.probe_duration(&audio_path).await;
        report.finished_at = Some(chrono::Utc::now());

        Ok(PodcastOutput {
            audio_path,
            report,
            workdir,
        })
    }

    /// Duration of the finished audio, if ffprobe can tell.
    async fn probe_duration(&self, path: &std::path::Path) -> Option<u64> {
        let tools = self.ffmpeg.clone();
        let path = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || {
            if !tools.is_ffprobe_available() {
                return None;
            }
            match tools.audio_duration_ms(&path) {
                Ok(ms) => Some(ms),
                Err(e) => {
                    log::debug!("could not probe output duration: {:#}", e);
                    None
                }
            }
        })
        .await;
        result.ok().flatten()
    }
}

/// Parse the PDF off the async runtime. An unreadable document degrades to
/// empty text.
async fn extract(pdf: Vec<u8>) -> Result<StageOutcome<ExtractedText>, PipelineError> {
    let result = tokio::task::spawn_blocking(move || pdf::extract_text(&pdf))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?;

    Ok(match result {
        Ok(extracted) if extracted.failed_pages.is_empty() => StageOutcome::Complete(extracted),
        Ok(extracted) => StageOutcome::Degraded {
            reason: format!(
                "{} of {} pages had no extractable text",
                extracted.failed_pages.len(),
                extracted.page_count
            ),
            value: extracted,
        },
        Err(e) => StageOutcome::Degraded {
            value: ExtractedText::default(),
            reason: e.to_string(),
        },
    })
}

/// The summary replaces the text even when some chunks failed.
fn summary_outcome(summary: SummaryReport) -> StageOutcome<String> {
    if summary.is_partial() {
        let reason = format!(
            "{} of {} chunks failed to summarize",
            summary.failures.len(),
            summary.total_chunks
        );
        StageOutcome::Degraded {
            value: summary.summary,
            reason,
        }
    } else {
        StageOutcome::Complete(summary.summary)
    }
}

fn finish<F>(report: &mut RunReport, on_event: &mut F, stage: Stage, status: StageStatus)
where
    F: FnMut(&PipelineEvent),
{
    if let StageStatus::Degraded { reason } = &status {
        log::warn!("{} degraded: {}", stage, reason);
        on_event(&PipelineEvent::Warning(format!("{} degraded: {}", stage, reason)));
    }
    on_event(&PipelineEvent::StageFinished {
        stage,
        status: status.clone(),
    });
    report.record(stage, status);
}
