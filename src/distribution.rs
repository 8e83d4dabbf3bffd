//! Five-way confidence distribution and its invariant checker.
//!
//! Every distribution handed to the presentation layer must satisfy:
//! all five labels present, all values >= 0, sum within 1e-6 of 1.0, and
//! argmax equal to the predicted label. The checker runs after local
//! scoring and after mapping any remote response.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::label::SentimentLabel;

/// Allowed drift of the probability-mass sum away from 1.0.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Dominant-label confidence bounds for synthesized distributions.
const DOMINANT_MIN: f64 = 0.35;
const DOMINANT_MAX: f64 = 0.95;

/// Mapping from each of the five labels to a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidences(BTreeMap<SentimentLabel, f64>);

impl Confidences {
    /// Build a distribution from explicit per-label values.
    pub fn from_pairs(pairs: [(SentimentLabel, f64); 5]) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Synthesized distribution for a locally scored text.
    ///
    /// The dominant label receives `0.5 + |score|`, clamped to
    /// [0.35, 0.95]; the remaining mass is split proportionally to the
    /// inverse of (1 + rank distance), so labels adjacent to the prediction
    /// receive more than distant ones.
    pub fn ranked(dominant: SentimentLabel, normalized_score: f64) -> Self {
        let top = (0.5 + normalized_score.abs().min(1.0)).clamp(DOMINANT_MIN, DOMINANT_MAX);
        let remainder = 1.0 - top;

        let weights: Vec<(SentimentLabel, f64)> = SentimentLabel::ALL
            .iter()
            .filter(|l| **l != dominant)
            .map(|l| {
                let dist = l.rank().abs_diff(dominant.rank());
                (*l, 1.0 / (1.0 + dist as f64))
            })
            .collect();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();

        let mut map = BTreeMap::new();
        map.insert(dominant, top);
        for (label, w) in weights {
            map.insert(label, remainder * w / total);
        }
        Self(map)
    }

    /// Distribution for a remote prediction that only reports the winning
    /// label and its confidence: the remainder is split evenly across the
    /// other four labels. The dominant value is clamped so the argmax
    /// invariant holds even for low-confidence remote answers.
    pub fn flat(dominant: SentimentLabel, confidence: f64) -> Self {
        let top = confidence.clamp(DOMINANT_MIN, 0.98);
        let share = (1.0 - top) / 4.0;
        let mut map = BTreeMap::new();
        for label in SentimentLabel::ALL {
            map.insert(label, if label == dominant { top } else { share });
        }
        Self(map)
    }

    /// Probability assigned to `label` (0.0 if absent, which only happens
    /// for distributions deserialized from untrusted input).
    pub fn get(&self, label: SentimentLabel) -> f64 {
        self.0.get(&label).copied().unwrap_or(0.0)
    }

    /// Label holding the largest probability. Ties resolve to the lowest
    /// rank, which is stable and deterministic.
    pub fn argmax(&self) -> SentimentLabel {
        let mut best = SentimentLabel::VeryNegative;
        let mut best_v = f64::NEG_INFINITY;
        for label in SentimentLabel::ALL {
            let v = self.get(label);
            if v > best_v {
                best = label;
                best_v = v;
            }
        }
        best
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Invariant checker: all five labels present, non-negative values,
    /// total mass 1.0 within tolerance, argmax equal to `stated`.
    pub fn validate(&self, stated: SentimentLabel) -> Result<(), EngineError> {
        if self.0.len() != SentimentLabel::ALL.len() {
            return Err(EngineError::InvalidDistribution {
                reason: format!("expected 5 labels, found {}", self.0.len()),
            });
        }
        if let Some((label, v)) = self.0.iter().find(|(_, v)| **v < 0.0) {
            return Err(EngineError::InvalidDistribution {
                reason: format!("negative probability {v} for {label}"),
            });
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(EngineError::InvalidDistribution {
                reason: format!("probabilities sum to {sum}"),
            });
        }
        let argmax = self.argmax();
        if argmax != stated {
            return Err(EngineError::InvalidDistribution {
                reason: format!("argmax {argmax} does not match stated label {stated}"),
            });
        }
        Ok(())
    }
}
