//! Sentiment labels and word polarity.
//!
//! The five labels are ordered Very Negative → Very Positive; the enum's
//! declaration order is the canonical rank used for distance calculations
//! in the confidence distribution.

use serde::{Deserialize, Serialize};

/// Polarity of a single lexicon word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// One of the five ordered sentiment classes.
///
/// Serialized names match the wire format consumed by the presentation
/// layer ("Very Negative", "Negative", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "Very Negative")]
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    #[serde(rename = "Very Positive")]
    VeryPositive,
}

impl SentimentLabel {
    /// All labels in rank order.
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryNegative,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::VeryPositive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::VeryNegative => "Very Negative",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
            SentimentLabel::VeryPositive => "Very Positive",
        }
    }

    /// 0-based rank, Very Negative = 0 .. Very Positive = 4.
    pub fn rank(self) -> usize {
        match self {
            SentimentLabel::VeryNegative => 0,
            SentimentLabel::Negative => 1,
            SentimentLabel::Neutral => 2,
            SentimentLabel::Positive => 3,
            SentimentLabel::VeryPositive => 4,
        }
    }

    /// Map a normalized score in ~[-1, 1] to a label. Buckets are inclusive
    /// on their upper bound; first match wins.
    pub fn from_normalized_score(score: f64) -> Self {
        if score <= -0.6 {
            SentimentLabel::VeryNegative
        } else if score <= -0.2 {
            SentimentLabel::Negative
        } else if score <= 0.2 {
            SentimentLabel::Neutral
        } else if score <= 0.6 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::VeryPositive
        }
    }

    /// Polarity mirror used when a counterfactual edit flips a text.
    /// Neutral flips to Positive: replacing a negative word with its antonym
    /// can only push the text upward.
    pub fn polarity_opposite(self) -> Self {
        match self {
            SentimentLabel::VeryNegative => SentimentLabel::VeryPositive,
            SentimentLabel::Negative => SentimentLabel::Positive,
            SentimentLabel::Neutral => SentimentLabel::Positive,
            SentimentLabel::Positive => SentimentLabel::Negative,
            SentimentLabel::VeryPositive => SentimentLabel::VeryNegative,
        }
    }

    /// Tolerant mapping for labels coming back from a remote service.
    /// Unknown strings fall back to Neutral.
    pub fn parse_remote(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "very negative" => SentimentLabel::VeryNegative,
            "negative" => SentimentLabel::Negative,
            "positive" => SentimentLabel::Positive,
            "very positive" => SentimentLabel::VeryPositive,
            _ => SentimentLabel::Neutral,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_on_upper_bound() {
        assert_eq!(
            SentimentLabel::from_normalized_score(-0.6),
            SentimentLabel::VeryNegative
        );
        assert_eq!(
            SentimentLabel::from_normalized_score(-0.2),
            SentimentLabel::Negative
        );
        assert_eq!(SentimentLabel::from_normalized_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_normalized_score(0.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_normalized_score(0.6), SentimentLabel::Positive);
        assert_eq!(
            SentimentLabel::from_normalized_score(0.61),
            SentimentLabel::VeryPositive
        );
    }

    #[test]
    fn opposite_mirrors_polarity() {
        assert_eq!(
            SentimentLabel::Negative.polarity_opposite(),
            SentimentLabel::Positive
        );
        assert_eq!(
            SentimentLabel::VeryNegative.polarity_opposite(),
            SentimentLabel::VeryPositive
        );
        assert_eq!(
            SentimentLabel::Neutral.polarity_opposite(),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn parse_remote_is_case_insensitive_with_neutral_fallback() {
        assert_eq!(
            SentimentLabel::parse_remote("VERY NEGATIVE"),
            SentimentLabel::VeryNegative
        );
        assert_eq!(SentimentLabel::parse_remote("positive"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::parse_remote("???"), SentimentLabel::Neutral);
    }

    #[test]
    fn serializes_to_display_names() {
        let json = serde_json::to_string(&SentimentLabel::VeryNegative).unwrap();
        assert_eq!(json, "\"Very Negative\"");
        let back: SentimentLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SentimentLabel::VeryNegative);
    }
}
