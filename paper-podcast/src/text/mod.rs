//! Text processing: word chunking for the summarizer and cleanup for speech.

pub mod chunker;
pub mod cleaner;

pub use chunker::chunk_words;
pub use cleaner::clean_for_speech;

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one\ttwo \n three "), 3);
    }
}
