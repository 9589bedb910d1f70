//! Chunked summarization through a completion provider.

use futures_util::{StreamExt, stream};
use llm_client::{LlmError, LlmProvider, LlmRequest};
use serde::Serialize;
use std::sync::Arc;

use crate::text::{chunk_words, chunker::DEFAULT_MAX_CHUNK_WORDS, word_count};

/// Instruction sent alongside every chunk.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You summarize excerpts of research papers for a \
spoken podcast. Reply with a concise plain-prose summary of the excerpt you are given: no \
headings, no bullet points, no markdown, no preamble.";

/// Options for [`Summarizer`].
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Words per chunk
    pub max_chunk_words: usize,
    /// Chunks shorter than this are skipped without a request
    pub min_chunk_words: usize,
    /// Completion length limit per chunk
    pub max_tokens: u32,
    pub temperature: f32,
    /// Requests in flight at once. Results are always reassembled in chunk order.
    pub concurrency: usize,
    pub system_prompt: Option<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_chunk_words: DEFAULT_MAX_CHUNK_WORDS,
            min_chunk_words: 5,
            max_tokens: 150,
            temperature: 0.2,
            concurrency: 1,
            system_prompt: Some(SUMMARY_SYSTEM_PROMPT.to_string()),
        }
    }
}

/// A chunk whose summary request failed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChunkFailure {
    /// Zero-based chunk index
    pub index: usize,
    pub error: String,
}

/// Result of summarizing a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryReport {
    /// Chunk summaries in chunk order, space separated
    pub summary: String,
    pub total_chunks: usize,
    pub summarized_chunks: usize,
    /// Chunks left out for being empty or too short
    pub skipped_chunks: usize,
    pub failures: Vec<ChunkFailure>,
}

impl SummaryReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Summarizes text chunk by chunk with an injected provider.
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    options: SummaryOptions,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, options: SummaryOptions) -> Self {
        Self { provider, options }
    }

    /// Summarize `text`.
    ///
    /// Never fails as a whole: a chunk whose request errors is recorded in
    /// `failures` and contributes nothing. There are no retries.
    pub async fn summarize(&self, text: &str) -> SummaryReport {
        let mut report = SummaryReport::default();
        let mut pending = Vec::new();

        for (index, chunk) in chunk_words(text, self.options.max_chunk_words).enumerate() {
            report.total_chunks += 1;
            let chunk = chunk.trim();
            if chunk.is_empty() || word_count(chunk) < self.options.min_chunk_words {
                log::debug!("skipping chunk {} ({} words)", index, word_count(chunk));
                report.skipped_chunks += 1;
                continue;
            }
            pending.push((index, chunk.to_string()));
        }

        log::info!(
            "summarizing {} of {} chunks via {} ({}), concurrency {}",
            pending.len(),
            report.total_chunks,
            self.provider.name(),
            self.provider.model(),
            self.options.concurrency
        );

        let results: Vec<(usize, Result<String, LlmError>)> = stream::iter(pending)
            .map(|(index, chunk)| async move { (index, self.summarize_chunk(chunk).await) })
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        let mut summary = String::new();
        for (index, result) in results {
            match result {
                Ok(content) => {
                    summary.push_str(&content);
                    summary.push(' ');
                    report.summarized_chunks += 1;
                }
                Err(e) => {
                    log::warn!("Error summarizing chunk {}: {}", index, e);
                    report.failures.push(ChunkFailure {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        report.summary = summary.trim().to_string();
        report
    }

    async fn summarize_chunk(&self, chunk: String) -> Result<String, LlmError> {
        let mut request = LlmRequest::new(chunk)
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature);
        if let Some(system) = &self.options.system_prompt {
            request = request.with_system_prompt(system.clone());
        }

        let response = self.provider.complete(request).await?;
        if let Some(usage) = response.usage {
            log::debug!(
                "tokens: {} in, {} out",
                usage.input_tokens,
                usage.output_tokens
            );
        }
        Ok(response.content)
    }
}
