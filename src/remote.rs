//! Remote inference adapter: provider abstraction + HTTP client.
//!
//! All three endpoints are best-effort. A failure of any kind maps to an
//! [`EngineError`] and the engine falls back to the local lexicon path;
//! nothing here is ever fatal.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RemoteConfig;
use crate::error::EngineError;
use crate::result::{CounterfactualResult, Feature};

/// Raw `/predict` response: winning label and its confidence only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePrediction {
    pub sentiment: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Raw `/explain` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteExplanation {
    pub text: String,
    pub explanation: ExplanationPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationPayload {
    #[serde(rename = "keyFeatures")]
    pub key_features: Vec<Feature>,
    #[serde(rename = "topClass")]
    pub top_class: String,
}

/// Error body the service returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Pluggable alternate source for the three analysis stages.
#[async_trait::async_trait]
pub trait RemoteInference: Send + Sync {
    async fn predict(&self, text: &str) -> Result<RemotePrediction, EngineError>;
    async fn explain(&self, text: &str) -> Result<RemoteExplanation, EngineError>;
    async fn counterfactual(&self, text: &str) -> Result<CounterfactualResult, EngineError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Trait-object alias used by the engine and tests.
pub type DynRemote = Arc<dyn RemoteInference>;

/// Factory: build a client according to config and environment.
///
/// * If `REMOTE_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if the config disables remote inference, returns a disabled client.
/// * Else builds the real HTTP client.
pub fn build_remote(config: &RemoteConfig) -> DynRemote {
    if std::env::var("REMOTE_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockRemote::with_prediction(RemotePrediction {
            sentiment: "Neutral".to_string(),
            confidence: 0.5,
            text: None,
        }));
    }
    if !config.enabled {
        return Arc::new(DisabledRemote);
    }
    Arc::new(HttpRemoteClient::new(config))
}

// ------------------------------------------------------------
// HTTP client
// ------------------------------------------------------------

/// reqwest-backed client for the remote inference service. Timeouts are
/// enforced at the client level, so every call through this adapter is
/// bounded.
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRemoteClient {
    pub fn new(config: &RemoteConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("review-sentiment-analyzer/0.1")
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, EngineError>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Network {
                reason: format!("{path}: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorDetail>()
                .await
                .map(|d| d.detail)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(EngineError::Network {
                reason: format!("{path}: {detail}"),
            });
        }

        resp.json::<T>().await.map_err(|e| EngineError::Network {
            reason: format!("{path}: malformed response: {e}"),
        })
    }
}

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SentenceBody<'a> {
    sentence: &'a str,
}

#[async_trait::async_trait]
impl RemoteInference for HttpRemoteClient {
    async fn predict(&self, text: &str) -> Result<RemotePrediction, EngineError> {
        self.post_json("/predict", &TextBody { text }).await
    }

    async fn explain(&self, text: &str) -> Result<RemoteExplanation, EngineError> {
        self.post_json::<_, RemoteExplanation>("/explain", &TextBody { text })
            .await
            .map_err(|e| EngineError::Explanation {
                reason: e.to_string(),
            })
    }

    async fn counterfactual(&self, text: &str) -> Result<CounterfactualResult, EngineError> {
        self.post_json::<_, CounterfactualResult>("/counterfactual", &SentenceBody { sentence: text })
            .await
            .map_err(|e| EngineError::Counterfactual {
                reason: e.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ------------------------------------------------------------
// Disabled + mock clients
// ------------------------------------------------------------

/// Fails every call; used when remote inference is switched off so the
/// engine exercises its local fallback unconditionally.
pub struct DisabledRemote;

#[async_trait::async_trait]
impl RemoteInference for DisabledRemote {
    async fn predict(&self, _text: &str) -> Result<RemotePrediction, EngineError> {
        Err(EngineError::Network {
            reason: "remote inference disabled".to_string(),
        })
    }

    async fn explain(&self, _text: &str) -> Result<RemoteExplanation, EngineError> {
        Err(EngineError::Explanation {
            reason: "remote inference disabled".to_string(),
        })
    }

    async fn counterfactual(&self, _text: &str) -> Result<CounterfactualResult, EngineError> {
        Err(EngineError::Counterfactual {
            reason: "remote inference disabled".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic stand-in for tests and local runs: each stage returns the
/// configured value, or the stage's failure when left unset.
#[derive(Default, Clone)]
pub struct MockRemote {
    pub prediction: Option<RemotePrediction>,
    pub explanation: Option<RemoteExplanation>,
    pub counterfactual: Option<CounterfactualResult>,
}

impl MockRemote {
    pub fn with_prediction(prediction: RemotePrediction) -> Self {
        Self {
            prediction: Some(prediction),
            ..Self::default()
        }
    }

    /// A mock whose every stage fails, like an unreachable service.
    pub fn unreachable() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RemoteInference for MockRemote {
    async fn predict(&self, _text: &str) -> Result<RemotePrediction, EngineError> {
        self.prediction.clone().ok_or_else(|| EngineError::Network {
            reason: "mock predict unset".to_string(),
        })
    }

    async fn explain(&self, _text: &str) -> Result<RemoteExplanation, EngineError> {
        self.explanation.clone().ok_or_else(|| EngineError::Explanation {
            reason: "mock explain unset".to_string(),
        })
    }

    async fn counterfactual(&self, _text: &str) -> Result<CounterfactualResult, EngineError> {
        self.counterfactual.clone().ok_or_else(|| EngineError::Counterfactual {
            reason: "mock counterfactual unset".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
