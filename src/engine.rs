//! # Analysis Engine
//! Sequences the three analysis stages (predict, explain, counterfactual)
//! remote-first with independent local fallback per stage. Holds the only
//! shared state in the system: the session counterfactual cache, the
//! request-generation counter used to discard stale stage results, and the
//! latest published analysis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use metrics::counter;
use tracing::{debug, warn};

use crate::analyzer::SentimentAnalyzer;
use crate::counterfactual::CounterfactualGenerator;
use crate::distribution::Confidences;
use crate::error::EngineError;
use crate::label::SentimentLabel;
use crate::remote::{DynRemote, RemotePrediction};
use crate::result::{AnalysisOutcome, AnalysisResult, CounterfactualResult, Feature};

/// Identifies one analysis request. Stage results computed under an older
/// token are discarded instead of overwriting newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone)]
struct Published {
    generation: u64,
    result: AnalysisResult,
}

pub struct AnalysisEngine {
    analyzer: SentimentAnalyzer,
    generator: CounterfactualGenerator,
    remote: DynRemote,
    generation: AtomicU64,
    latest: Mutex<Option<Published>>,
    cf_cache: Mutex<HashMap<String, CounterfactualResult>>,
}

impl AnalysisEngine {
    pub fn new(remote: DynRemote) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(),
            generator: CounterfactualGenerator::new(),
            remote,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            cf_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Engine with no remote collaborator; every stage computes locally.
    pub fn local() -> Self {
        Self::new(std::sync::Arc::new(crate::remote::DisabledRemote))
    }

    /// Start a new logical request, invalidating tokens of all earlier ones.
    pub fn begin_request(&self) -> RequestToken {
        RequestToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Latest result published by [`analyze`](Self::analyze), if any.
    pub fn latest(&self) -> Option<AnalysisResult> {
        self.latest
            .lock()
            .expect("latest mutex poisoned")
            .as_ref()
            .map(|p| p.result.clone())
    }

    /// Primary-label stage: remote prediction when available, local scoring
    /// otherwise. Network failures are never surfaced for this stage.
    pub async fn predict(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        let text = validated(text)?;
        counter!("analysis_requests_total").increment(1);

        match self.remote.predict(text).await {
            Ok(prediction) => match map_prediction(text, prediction) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    counter!("predict_fallback_total").increment(1);
                    warn!(error = %e, "remote prediction invalid; scoring locally");
                }
            },
            Err(e) => {
                counter!("predict_fallback_total").increment(1);
                warn!(error = %e, "remote prediction unavailable; scoring locally");
            }
        }
        Ok(self.analyzer.analyze(text))
    }

    /// Explanation stage: remote key features, or the local extractor's.
    pub async fn explain(&self, text: &str) -> Result<Vec<Feature>, EngineError> {
        let text = validated(text)?;

        match self.remote.explain(text).await {
            Ok(explanation) => Ok(explanation.explanation.key_features),
            Err(e) => {
                counter!("explain_fallback_total").increment(1);
                warn!(error = %e, "remote explanation unavailable; extracting locally");
                Ok(self.analyzer.analyze(text).key_features)
            }
        }
    }

    /// Counterfactual stage. Results are cached per input text for the
    /// lifetime of the engine, so repeated requests are idempotent.
    pub async fn counterfactual(&self, text: &str) -> Result<CounterfactualResult, EngineError> {
        let text = validated(text)?;

        if let Some(hit) = self
            .cf_cache
            .lock()
            .expect("counterfactual cache poisoned")
            .get(text)
        {
            counter!("counterfactual_cache_hits_total").increment(1);
            return Ok(hit.clone());
        }

        let result = match self.remote.counterfactual(text).await {
            Ok(remote) => remote,
            Err(e) => {
                counter!("counterfactual_fallback_total").increment(1);
                warn!(error = %e, "remote counterfactual unavailable; simulating locally");
                let prior = self.latest().filter(|r| r.text == text);
                self.generator
                    .generate_with_prior(text, prior.as_ref())
                    .ok_or_else(|| EngineError::Counterfactual {
                        reason: "no counterfactual applicable".to_string(),
                    })?
            }
        };

        self.cf_cache
            .lock()
            .expect("counterfactual cache poisoned")
            .insert(text.to_string(), result.clone());
        Ok(result)
    }

    /// Full pipeline: predict, publish, enrich with the explanation, then
    /// counterfactual (with the published analysis as prior). Explanation
    /// and counterfactual failures degrade; they never abort the run.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisOutcome, EngineError> {
        let token = self.begin_request();
        let base = self.predict(text).await?;
        self.publish(token, base.clone());

        let analysis = match self.explain(text).await {
            Ok(features) => {
                let enriched = base.with_key_features(features);
                self.publish(token, enriched.clone());
                enriched
            }
            Err(_) => base,
        };

        let counterfactual = self.counterfactual(text).await.ok();
        Ok(AnalysisOutcome {
            analysis,
            counterfactual,
        })
    }

    /// Publish `result` as the latest analysis unless a newer request has
    /// started meanwhile. Returns whether the result was applied.
    pub fn publish(&self, token: RequestToken, result: AnalysisResult) -> bool {
        if !self.is_current(token) {
            counter!("stale_results_discarded_total").increment(1);
            debug!(generation = token.0, "discarding stale analysis result");
            return false;
        }
        let mut guard = self.latest.lock().expect("latest mutex poisoned");
        match guard.as_ref() {
            Some(p) if p.generation > token.0 => false,
            _ => {
                *guard = Some(Published {
                    generation: token.0,
                    result,
                });
                true
            }
        }
    }
}

/// Reject empty or whitespace-only input before any stage runs.
fn validated(text: &str) -> Result<&str, EngineError> {
    if text.trim().is_empty() {
        return Err(EngineError::InvalidInput);
    }
    Ok(text)
}

/// Shape a raw remote prediction into a full result: parse the label,
/// spread the confidence, and verify the distribution invariants before
/// trusting it.
fn map_prediction(text: &str, prediction: RemotePrediction) -> Result<AnalysisResult, EngineError> {
    if !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(EngineError::InvalidDistribution {
            reason: format!("remote confidence {} out of range", prediction.confidence),
        });
    }
    let sentiment = SentimentLabel::parse_remote(&prediction.sentiment);
    let confidences = Confidences::flat(sentiment, prediction.confidence);
    confidences.validate(sentiment)?;
    Ok(AnalysisResult {
        text: text.to_string(),
        sentiment,
        confidences,
        // Filled in later by the explanation stage.
        key_features: Vec::new(),
    })
}
