use adlens_core::SentimentLabel;
use async_trait::async_trait;

use super::{SentimentOracle, SentimentReading};
use crate::lexicon::SentimentLexicon;

/// Keyword-count classifier.
///
/// Counts how many positive and negative words occur as substrings. The
/// larger side wins with `0.7 + 0.1 * count` (positive) or `0.3 - 0.1 * count`
/// (negative); a tie is neutral at `0.5`. The score is not clamped.
#[derive(Debug, Clone, Default)]
pub struct LocalSentimentOracle {
    lexicon: SentimentLexicon,
}

impl LocalSentimentOracle {
    #[must_use]
    pub fn new(lexicon: SentimentLexicon) -> Self {
        Self { lexicon }
    }

    #[must_use]
    pub fn classify_text(&self, text: &str) -> SentimentReading {
        let text = text.to_lowercase();
        let count = |words: &[String]| words.iter().filter(|w| text.contains(w.as_str())).count();
        let positive = count(&self.lexicon.positive);
        let negative = count(&self.lexicon.negative);

        #[allow(clippy::cast_precision_loss)]
        let (pos, neg) = (positive as f64, negative as f64);
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => {
                SentimentReading::new(SentimentLabel::Positive, 0.7 + pos * 0.1)
            }
            std::cmp::Ordering::Less => SentimentReading::new(SentimentLabel::Negative, 0.3 - neg * 0.1),
            std::cmp::Ordering::Equal => SentimentReading::new(SentimentLabel::Neutral, 0.5),
        }
    }
}

#[async_trait]
impl SentimentOracle for LocalSentimentOracle {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn classify(&self, text: &str) -> SentimentReading {
        self.classify_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> LocalSentimentOracle {
        LocalSentimentOracle::default()
    }

    #[test]
    fn empty_text_is_neutral() {
        let reading = oracle().classify_text("");
        assert_eq!(reading.label, SentimentLabel::Neutral);
        assert!((reading.score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn positive_words_raise_the_score() {
        // "best" and "expert"
        let reading = oracle().classify_text("Best course from an expert");
        assert_eq!(reading.label, SentimentLabel::Positive);
        assert!((reading.score - 0.9).abs() < 1e-9, "got {}", reading.score);
    }

    #[test]
    fn negative_words_lower_the_score() {
        let reading = oracle().classify_text("a hard problem");
        assert_eq!(reading.label, SentimentLabel::Negative);
        assert!((reading.score - 0.1).abs() < 1e-9, "got {}", reading.score);
    }

    #[test]
    fn balanced_counts_are_neutral() {
        let reading = oracle().classify_text("great but difficult");
        assert_eq!(reading.label, SentimentLabel::Neutral);
    }

    #[test]
    fn heavy_positive_text_exceeds_one() {
        let reading =
            oracle().classify_text("great excellent amazing best top leading proven success");
        assert!(reading.score > 1.0, "got {}", reading.score);
        assert!((reading.bounded_confidence() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heavy_negative_text_goes_below_zero() {
        let reading = oracle().classify_text("difficult hard complex challenging struggle");
        assert!(reading.score < 0.0, "got {}", reading.score);
    }
}
