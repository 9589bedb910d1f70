//! Fixed-size word chunking for summarization.

use std::str::SplitWhitespace;

/// Default chunk size in words.
pub const DEFAULT_MAX_CHUNK_WORDS: usize = 512;

/// Lazy iterator over consecutive word windows of a text.
///
/// Each item is up to `max_words` words joined by single spaces. Chunk `i`
/// covers words `[i * max_words, (i + 1) * max_words)`; the last one may be
/// shorter. The iterator is single-pass: call [`chunk_words`] again to
/// restart.
#[derive(Debug, Clone)]
pub struct WordChunks<'a> {
    words: SplitWhitespace<'a>,
    max_words: usize,
}

impl<'a> Iterator for WordChunks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut chunk = String::new();

        for word in self.words.by_ref().take(self.max_words) {
            if !chunk.is_empty() {
                chunk.push(' ');
            }
            chunk.push_str(word);
        }

        if chunk.is_empty() { None } else { Some(chunk) }
    }
}

impl std::iter::FusedIterator for WordChunks<'_> {}

/// Split text into chunks of at most `max_words` whitespace-separated words.
///
/// A `max_words` of zero is treated as one.
pub fn chunk_words(text: &str, max_words: usize) -> WordChunks<'_> {
    WordChunks {
        words: text.split_whitespace(),
        max_words: max_words.max(1),
    }
}
