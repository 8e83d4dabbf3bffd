//! # Counterfactual Generator
//! Produces a one-word edit that flips a text's predicted sentiment, with
//! synthesized before/after probabilities.
//!
//! Confidence synthesis is deterministic: values are derived from a SHA-256
//! digest of the input text, so repeated requests for identical text return
//! identical output without any caller-side caching.

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::label::{Polarity, SentimentLabel};
use crate::lexicon;
use crate::result::{AnalysisResult, CounterfactualResult};

/// Target word used when the text tokenizes to nothing at all.
const PLACEHOLDER_TOKEN: &str = "sample";

/// Synthesized original confidence lies in [0.3, 0.7).
const ORIGINAL_PROB_BASE: f64 = 0.3;
const ORIGINAL_PROB_SPAN: f64 = 0.4;
/// Synthesized counterfactual confidence lies in [0.6, 0.95).
const COUNTERFACTUAL_PROB_BASE: f64 = 0.6;
const COUNTERFACTUAL_PROB_SPAN: f64 = 0.35;
/// Minimum improvement over the original confidence.
const MIN_IMPROVEMENT: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct CounterfactualGenerator;

impl CounterfactualGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a counterfactual for `text`. Returns `None` for empty or
    /// whitespace-only input: there is nothing to edit.
    pub fn generate(&self, text: &str) -> Option<CounterfactualResult> {
        self.generate_with_prior(text, None)
    }

    /// Like [`generate`](Self::generate), but when a scored result for the
    /// same text is available, the "before" side uses its real label and
    /// confidence instead of synthesized placeholders.
    pub fn generate_with_prior(
        &self,
        text: &str,
        prior: Option<&AnalysisResult>,
    ) -> Option<CounterfactualResult> {
        if text.trim().is_empty() {
            return None;
        }

        // Most negative lexicon word; strict comparison keeps the first
        // occurrence on ties.
        let mut target: Option<(String, f64)> = None;
        for key in lexicon::tokenize(text) {
            let Some(entry) = lexicon::lookup(&key) else {
                continue;
            };
            if entry.sentiment != Polarity::Negative {
                continue;
            }
            if target.as_ref().map_or(true, |(_, best)| entry.value > *best) {
                target = Some((key, entry.value));
            }
        }

        let degraded = target.is_none();
        let target_word = target.map(|(w, _)| w).unwrap_or_else(|| {
            lexicon::tokenize(text)
                .next()
                .unwrap_or_else(|| PLACEHOLDER_TOKEN.to_string())
        });

        let replacement = lexicon::antonym(&target_word);
        let counterfactual_sentence = replace_first_word(text, &target_word, replacement);

        let prior = prior.filter(|r| r.text == text);
        let (original_sentiment, original_prob) = match prior {
            Some(r) => (r.sentiment, r.top_confidence()),
            None => (
                SentimentLabel::Negative,
                ORIGINAL_PROB_BASE + derived_unit(text, 0) * ORIGINAL_PROB_SPAN,
            ),
        };
        let counterfactual_sentiment = original_sentiment.polarity_opposite();

        // Floor at the original plus a minimum improvement so the delta is
        // always positive; the synthesized path stays inside [0.6, 0.95),
        // while a high-confidence prior can push the ceiling up to 0.99.
        let base = COUNTERFACTUAL_PROB_BASE + derived_unit(text, 1) * COUNTERFACTUAL_PROB_SPAN;
        let counterfactual_prob = base.max(original_prob + MIN_IMPROVEMENT).min(0.99);

        Some(CounterfactualResult {
            original_sentence: text.to_string(),
            target_word,
            counterfactual_sentence,
            original_sentiment,
            original_prob,
            counterfactual_sentiment,
            counterfactual_prob,
            sentiment_change: counterfactual_prob - original_prob,
            degraded,
        })
    }
}

/// Replace the first whole-word, case-insensitive occurrence of `word`.
fn replace_first_word(text: &str, word: &str, replacement: &str) -> String {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.replace(text, replacement).into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Deterministic value in [0, 1) from the text digest; `lane` selects
/// independent bytes so the two probabilities are uncorrelated.
fn derived_unit(text: &str, lane: usize) -> f64 {
    let digest = Sha256::digest(text.as_bytes());
    let i = lane * 2;
    let v = u16::from_be_bytes([digest[i], digest[i + 1]]);
    f64::from(v) / (f64::from(u16::MAX) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SentimentAnalyzer;

    fn generate(text: &str) -> CounterfactualResult {
        CounterfactualGenerator::new()
            .generate(text)
            .expect("counterfactual for non-empty text")
    }

    #[test]
    fn empty_input_yields_nothing() {
        let generator = CounterfactualGenerator::new();
        assert!(generator.generate("").is_none());
        assert!(generator.generate("   \t ").is_none());
    }

    #[test]
    fn picks_the_most_negative_word_and_its_antonym() {
        let r = generate("this is the worst product ever");
        assert_eq!(r.target_word, "worst");
        assert_eq!(r.counterfactual_sentence, "this is the best product ever");
        assert_eq!(r.original_sentiment, SentimentLabel::Negative);
        assert_eq!(r.counterfactual_sentiment, SentimentLabel::Positive);
        assert!(r.sentiment_change > 0.0);
        assert!(!r.degraded);
    }

    #[test]
    fn magnitude_wins_over_text_order() {
        // "bad" (0.7) comes first but "terrible" (0.85) is stronger.
        let r = generate("bad food and terrible service");
        assert_eq!(r.target_word, "terrible");
        assert_eq!(r.counterfactual_sentence, "bad food and excellent service");
    }

    #[test]
    fn first_occurrence_wins_ties() {
        // "waste" and "horrible" share magnitude 0.8.
        let r = generate("a waste of money, horrible support");
        assert_eq!(r.target_word, "waste");
    }

    #[test]
    fn replacement_is_case_insensitive_and_whole_word() {
        let r = generate("Worst. Worthless customer care.");
        assert_eq!(r.target_word, "worst");
        assert!(r.counterfactual_sentence.starts_with("best."));
        // "Worthless" must not be touched by the whole-word replacement.
        assert!(r.counterfactual_sentence.contains("Worthless"));
    }

    #[test]
    fn degraded_mode_substitutes_the_first_token() {
        let r = generate("lovely weather today");
        assert!(r.degraded);
        assert_eq!(r.target_word, "lovely");
        assert_eq!(r.counterfactual_sentence, "good weather today");
    }

    #[test]
    fn synthesized_probabilities_stay_in_range_with_positive_delta() {
        for text in [
            "this is the worst product ever",
            "bad bad bad",
            "nothing to complain about",
            "terrible",
        ] {
            let r = generate(text);
            assert!((0.3..0.7).contains(&r.original_prob), "orig for {text:?}");
            assert!(
                (0.6..0.95).contains(&r.counterfactual_prob) || r.counterfactual_prob == 0.95,
                "cf for {text:?}"
            );
            assert!(r.sentiment_change > 0.0, "delta for {text:?}");
            assert!(
                (r.sentiment_change - (r.counterfactual_prob - r.original_prob)).abs() < 1e-12
            );
        }
    }

    #[test]
    fn identical_text_yields_identical_output() {
        let generator = CounterfactualGenerator::new();
        let a = generator.generate("service was bad").unwrap();
        let b = generator.generate("service was bad").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prior_analysis_supplies_the_before_side() {
        let text = "this is the worst product ever";
        let prior = SentimentAnalyzer::new().analyze(text);
        let r = CounterfactualGenerator::new()
            .generate_with_prior(text, Some(&prior))
            .unwrap();
        assert_eq!(r.original_sentiment, prior.sentiment);
        assert!((r.original_prob - prior.top_confidence()).abs() < 1e-12);
        assert_eq!(
            r.counterfactual_sentiment,
            prior.sentiment.polarity_opposite()
        );
        assert!(r.sentiment_change > 0.0);
    }

    #[test]
    fn prior_for_different_text_is_ignored() {
        let prior = SentimentAnalyzer::new().analyze("great stuff");
        let r = CounterfactualGenerator::new()
            .generate_with_prior("this is the worst product ever", Some(&prior))
            .unwrap();
        assert_eq!(r.original_sentiment, SentimentLabel::Negative);
    }
}
