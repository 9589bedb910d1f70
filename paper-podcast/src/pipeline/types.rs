//! Stage and event types for a pipeline run.

use serde::Serialize;
use std::fmt;

/// A step of the PDF-to-podcast pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extracting,
    Summarizing,
    Synthesizing,
    Mixing,
}

impl Stage {
    /// Progress message shown while the stage runs.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extracting => "Extracting text from PDF...",
            Stage::Summarizing => "Summarizing text...",
            Stage::Synthesizing => "Converting text to speech...",
            Stage::Mixing => "Mixing in background music...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extracting => "extraction",
            Stage::Summarizing => "summarization",
            Stage::Synthesizing => "synthesis",
            Stage::Mixing => "mixing",
        };
        f.write_str(name)
    }
}

/// Value produced by a stage that tolerates failure.
///
/// Hard failures are reported as errors instead; a degraded outcome still
/// carries a usable value and the run continues with it.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Complete(T),
    Degraded { value: T, reason: String },
}

impl<T> StageOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            StageOutcome::Complete(value) | StageOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Complete(value) | StageOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn status(&self) -> StageStatus {
        match self {
            StageOutcome::Complete(_) => StageStatus::Complete,
            StageOutcome::Degraded { reason, .. } => StageStatus::Degraded {
                reason: reason.clone(),
            },
        }
    }
}

/// How a stage ended, as recorded in the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Complete,
    Degraded { reason: String },
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Complete => f.write_str("done"),
            StageStatus::Degraded { reason } => write!(f, "degraded: {}", reason),
            StageStatus::Skipped => f.write_str("skipped"),
        }
    }
}

/// Progress notifications emitted during [`super::Pipeline::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StageStarted(Stage),
    StageFinished { stage: Stage, status: StageStatus },
    Warning(String),
}
