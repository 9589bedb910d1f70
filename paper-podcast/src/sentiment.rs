//! Lexicon-based sentiment polarity.

use vader_sentiment::SentimentIntensityAnalyzer;

/// Speech rate suggested for text with positive polarity.
pub const POSITIVE_SPEECH_RATE: f32 = 1.0;
/// Speech rate suggested for neutral or negative text.
pub const SUBDUED_SPEECH_RATE: f32 = 0.9;

/// Polarity of `text` in [-1.0, 1.0] (VADER compound score).
///
/// Empty or whitespace-only text is neutral (0.0).
pub fn polarity(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let analyzer = SentimentIntensityAnalyzer::new();
    let scores = analyzer.polarity_scores(text);
    scores
        .get("compound")
        .copied()
        .unwrap_or(0.0)
        .clamp(-1.0, 1.0)
}

/// Nominal speech rate for a polarity: 1.0 when positive, 0.9 otherwise.
pub fn speech_rate_for(polarity: f64) -> f32 {
    if polarity > 0.0 {
        POSITIVE_SPEECH_RATE
    } else {
        SUBDUED_SPEECH_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("   \n"), 0.0);
    }

    #[test]
    fn test_positive_text() {
        let score = polarity("This is a wonderful, excellent and truly great result. We love it!");
        assert!(score > 0.0, "expected positive, got {}", score);
    }

    #[test]
    fn test_negative_text() {
        let score = polarity("This is a terrible, awful and horrible failure. We hate it.");
        assert!(score < 0.0, "expected negative, got {}", score);
    }

    #[test]
    fn test_range() {
        let score = polarity("good good good good good good good good great great great amazing");
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_speech_rate_for() {
        assert_eq!(speech_rate_for(0.8), 1.0);
        assert_eq!(speech_rate_for(0.0), 0.9);
        assert_eq!(speech_rate_for(-0.4), 0.9);
    }
}
