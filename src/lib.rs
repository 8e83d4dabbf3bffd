// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyzer;
pub mod api;
pub mod config;
pub mod counterfactual;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod label;
pub mod lexicon;
pub mod metrics;
pub mod remote;
pub mod result;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::SentimentAnalyzer;
pub use crate::counterfactual::CounterfactualGenerator;
pub use crate::distribution::Confidences;
pub use crate::engine::{AnalysisEngine, RequestToken};
pub use crate::error::EngineError;
pub use crate::label::{Polarity, SentimentLabel};
pub use crate::result::{AnalysisOutcome, AnalysisResult, CounterfactualResult, Feature};

// Convenient access to the router builder: `crate_root::api::create_router`
// or `crate_root::create_router`.
pub use crate::api::create_router;
