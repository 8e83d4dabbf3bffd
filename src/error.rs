//! Engine error kinds. Every remote-stage failure here is recoverable: the
//! engine degrades to the local lexicon computation instead of surfacing a
//! hard failure.

/// Errors produced by the analysis engine and its remote adapter.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Remote service unreachable, timed out, or returned a non-2xx status.
    #[error("remote inference unavailable: {reason}")]
    Network { reason: String },

    /// The explanation stage failed; key features stay empty or come from
    /// the local extractor.
    #[error("explanation failed: {reason}")]
    Explanation { reason: String },

    /// The counterfactual stage failed; the local generator takes over.
    #[error("counterfactual analysis failed: {reason}")]
    Counterfactual { reason: String },

    /// Empty or whitespace-only input, rejected before any engine stage.
    #[error("empty text provided")]
    InvalidInput,

    /// A confidence distribution violated the presentation invariants
    /// (all labels present, non-negative, sums to 1, argmax == label).
    #[error("invalid confidence distribution: {reason}")]
    InvalidDistribution { reason: String },
}
