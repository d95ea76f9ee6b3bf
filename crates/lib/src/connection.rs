//! Host-platform connection port.
//!
//! The orchestration host owns credential storage; the connector only needs
//! a lookup by connection id. `ConfigConnectionSource` backs the same port
//! with the local config file for standalone/CLI use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stored connection record: REST API key in `login`, refresh token in
/// `password`, optional secrets (e.g. `client_secret`) in `extra` JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConnection {
    pub login: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub extra: serde_json::Value,
}

impl StoredConnection {
    /// Read a string field from the extra JSON (e.g. "client_secret").
    pub fn extra_str(&self, key: &str) -> Option<String> {
        self.extra.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
    }
}

/// Lookup capability provided by the host platform (or the local config).
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Fetch the stored connection for an id. Err means the id is unknown
    /// or the backing store failed.
    async fn lookup(&self, conn_id: &str) -> Result<StoredConnection, String>;
}

/// Connection source backed by the config file's `connections` table.
pub struct ConfigConnectionSource {
    connections: HashMap<String, StoredConnection>,
}

impl ConfigConnectionSource {
    pub fn new(connections: HashMap<String, StoredConnection>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl ConnectionSource for ConfigConnectionSource {
    async fn lookup(&self, conn_id: &str) -> Result<StoredConnection, String> {
        self.connections
            .get(conn_id)
            .cloned()
            .ok_or_else(|| format!("no connection named '{}' in config", conn_id))
    }
}
