//! Remote-adapter configuration.
//!
//! Loaded from `config/remote.json` when present, with environment
//! overrides on top. Invalid values are sanitized back to defaults rather
//! than rejected; the engine must always come up.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "config/remote.json";

pub const ENV_REMOTE_ENABLED: &str = "REMOTE_API_ENABLED";
pub const ENV_REMOTE_BASE_URL: &str = "REMOTE_API_BASE_URL";
pub const ENV_REMOTE_TIMEOUT_SECS: &str = "REMOTE_TIMEOUT_SECS";

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// When false, the engine runs purely on the local lexicon.
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall per-request time limit for any remote call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: RemoteConfig = serde_json::from_str(&data)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load from the default path if present, otherwise defaults; then
    /// apply environment overrides.
    pub fn load() -> Self {
        let mut cfg = Self::load_from_file(DEFAULT_CONFIG_PATH).unwrap_or_default();
        cfg.apply_env_overrides();
        cfg.sanitize();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var(ENV_REMOTE_ENABLED) {
            self.enabled = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = env::var(ENV_REMOTE_BASE_URL) {
            if !v.trim().is_empty() {
                self.base_url = v.trim().to_string();
            }
        }
        if let Some(secs) = env::var(ENV_REMOTE_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
    }

    fn sanitize(&mut self) {
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = default_connect_timeout_secs();
        }
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
    }
}
