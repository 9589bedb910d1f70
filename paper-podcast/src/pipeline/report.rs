//! Serializable record of a pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::types::{Stage, StageStatus};
use crate::summarize::{ChunkFailure, SummaryReport};

/// Outcome of one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Chunk accounting for the summarization stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryStats {
    pub total_chunks: usize,
    pub summarized_chunks: usize,
    pub skipped_chunks: usize,
    pub failed_chunks: Vec<ChunkFailure>,
    pub summary_words: usize,
}

impl From<&SummaryReport> for SummaryStats {
    fn from(report: &SummaryReport) -> Self {
        Self {
            total_chunks: report.total_chunks,
            summarized_chunks: report.summarized_chunks,
            skipped_chunks: report.skipped_chunks,
            failed_chunks: report.failures.clone(),
            summary_words: crate::text::word_count(&report.summary),
        }
    }
}

/// Everything worth knowing about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageRecord>,
    pub page_count: usize,
    /// 1-based pages whose text could not be extracted
    pub failed_pages: Vec<u32>,
    pub extracted_words: usize,
    pub summary: Option<SummaryStats>,
    /// Words handed to speech synthesis
    pub spoken_words: usize,
    pub sentiment: Option<f64>,
    /// Derived from sentiment; not applied to synthesis
    pub nominal_speech_rate: Option<f32>,
    pub background_mixed: bool,
    pub duration_ms: Option<u64>,
    /// Where the CLI saved the audio
    pub output: Option<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
            page_count: 0,
            failed_pages: Vec::new(),
            extracted_words: 0,
            summary: None,
            spoken_words: 0,
            sentiment: None,
            nominal_speech_rate: None,
            background_mixed: false,
            duration_ms: None,
            output: None,
        }
    }

    pub fn record(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageRecord { stage, status });
    }

    #[cfg(test)]
    pub fn status_of(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.status)
    }

    /// True if any stage finished degraded.
    pub fn is_degraded(&self) -> bool {
        self.stages
            .iter()
            .any(|r| matches!(r.status, StageStatus::Degraded { .. }))
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
