//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.kako/config.json`) and
//! environment. Holds the Kakao connector settings and a connections table
//! for standalone use; a workflow host supplies its own connection storage.

use crate::connection::StoredConnection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Connection id used when none is configured or passed.
pub const DEFAULT_CONN_ID: &str = "kakao_default";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Kakao connector settings.
    #[serde(default)]
    pub kakao: KakaoConfig,

    /// Stored connections by id (login = REST API key, password = refresh
    /// token, extra = optional secrets JSON).
    #[serde(default)]
    pub connections: HashMap<String, StoredConnection>,
}

/// Kakao connector config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoConfig {
    /// Connection id to resolve credentials from (default "kakao_default").
    #[serde(default = "default_conn_id")]
    pub conn_id: String,

    /// Direct access token. Overridden by KAKAO_ACCESS_TOKEN env. When set,
    /// no token refresh call is made.
    pub token: Option<String>,
}

fn default_conn_id() -> String {
    DEFAULT_CONN_ID.to_string()
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            conn_id: default_conn_id(),
            token: None,
        }
    }
}

/// Resolve the direct access token: env KAKAO_ACCESS_TOKEN overrides config.
pub fn resolve_kakao_token(config: &Config) -> Option<String> {
    std::env::var("KAKAO_ACCESS_TOKEN")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .kakao
                .token
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("KAKO_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".kako").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the default path (or KAKO_CONFIG_PATH). Missing file =>
/// default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
