//! Result shapes handed to the presentation layer.
//!
//! `AnalysisResult` and `CounterfactualResult` serialize to the exact wire
//! shapes the UI consumes (`keyFeatures`, `original_sentence`, ...), so they
//! round-trip through JSON with no loss. Both are immutable once built; an
//! explanation arriving later produces a *new* result via
//! [`AnalysisResult::with_key_features`] rather than mutating shared state.

use serde::{Deserialize, Serialize};

use crate::distribution::Confidences;
use crate::label::{Polarity, SentimentLabel};

/// Upper bound on the key-feature list in any result.
pub const MAX_KEY_FEATURES: usize = 10;

/// A word extracted from input text with an attributed importance.
/// Importance carries the polarity sign: negative words get negative
/// importance of the same magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub word: String,
    pub importance: f64,
    pub sentiment: Polarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributes_to: Option<String>,
}

/// Full scoring result for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub sentiment: SentimentLabel,
    pub confidences: Confidences,
    #[serde(rename = "keyFeatures", default)]
    pub key_features: Vec<Feature>,
}

impl AnalysisResult {
    /// Revision with a richer feature list (e.g. once a remote explanation
    /// lands). Features are re-ranked and capped here so the invariants
    /// hold no matter where the list came from.
    pub fn with_key_features(mut self, features: Vec<Feature>) -> Self {
        self.key_features = rank_features(features);
        self
    }

    /// Confidence assigned to the predicted label.
    pub fn top_confidence(&self) -> f64 {
        self.confidences.get(self.sentiment)
    }
}

/// Sort by descending absolute importance (stable, so earlier text position
/// wins ties) and truncate to [`MAX_KEY_FEATURES`].
pub fn rank_features(mut features: Vec<Feature>) -> Vec<Feature> {
    features.sort_by(|a, b| {
        b.importance
            .abs()
            .partial_cmp(&a.importance.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    features.truncate(MAX_KEY_FEATURES);
    features
}

/// A one-word edit that flips the predicted sentiment, with before/after
/// probabilities. `sentiment_change` is always `counterfactual_prob -
/// original_prob`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualResult {
    pub original_sentence: String,
    pub target_word: String,
    pub counterfactual_sentence: String,
    pub original_sentiment: SentimentLabel,
    pub original_prob: f64,
    pub counterfactual_sentiment: SentimentLabel,
    pub counterfactual_prob: f64,
    pub sentiment_change: f64,
    /// True when no negative-polarity word was found and the first token
    /// was substituted instead; such an edit is not semantically meaningful.
    #[serde(default)]
    pub degraded: bool,
}

/// Combined outcome of a full pipeline run: the (possibly enriched)
/// analysis plus the counterfactual, when one applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub analysis: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterfactual: Option<CounterfactualResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            text: "service was bad".to_string(),
            sentiment: SentimentLabel::Negative,
            confidences: Confidences::flat(SentimentLabel::Negative, 0.7),
            key_features: vec![Feature {
                word: "bad".to_string(),
                importance: -0.7,
                sentiment: Polarity::Negative,
                contributes_to: Some("NOT Neutral".to_string()),
            }],
        }
    }

    #[test]
    fn analysis_result_serializes_wire_shape() {
        let v = serde_json::to_value(sample_analysis()).unwrap();
        assert_eq!(v["sentiment"], json!("Negative"));
        assert!(v["confidences"]["Very Negative"].is_number());
        let feats = v["keyFeatures"].as_array().expect("keyFeatures array");
        assert_eq!(feats[0]["word"], json!("bad"));
        assert_eq!(feats[0]["sentiment"], json!("negative"));
        assert_eq!(feats[0]["contributes_to"], json!("NOT Neutral"));
    }

    #[test]
    fn analysis_result_round_trips_through_json() {
        let original = sample_analysis();
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: AnalysisResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn counterfactual_round_trips_through_json() {
        let original = CounterfactualResult {
            original_sentence: "this is the worst product ever".to_string(),
            target_word: "worst".to_string(),
            counterfactual_sentence: "this is the best product ever".to_string(),
            original_sentiment: SentimentLabel::Negative,
            original_prob: 0.42,
            counterfactual_sentiment: SentimentLabel::Positive,
            counterfactual_prob: 0.81,
            sentiment_change: 0.39,
            degraded: false,
        };
        let encoded = serde_json::to_string(&original).unwrap();
        assert!(encoded.contains("\"original_sentence\""));
        assert!(encoded.contains("\"target_word\""));
        let decoded: CounterfactualResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn with_key_features_reranks_and_caps() {
        let features: Vec<Feature> = (0..15)
            .map(|i| Feature {
                word: format!("w{i}"),
                importance: i as f64 / 20.0,
                sentiment: Polarity::Neutral,
                contributes_to: None,
            })
            .collect();
        let enriched = sample_analysis().with_key_features(features);
        assert_eq!(enriched.key_features.len(), MAX_KEY_FEATURES);
        for pair in enriched.key_features.windows(2) {
            assert!(pair[0].importance.abs() >= pair[1].importance.abs());
        }
    }
}
