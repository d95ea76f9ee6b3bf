//! Access-token resolution via OAuth2 refresh-token exchange.
//!
//! A direct token override short-circuits everything. Otherwise the stored
//! refresh token is exchanged once per provider instance and the result is
//! memoized, so a provider built per invocation makes at most one refresh
//! call no matter how often the token is read. Rotated refresh tokens are
//! logged and dropped; persistence belongs to an external process.

use crate::connection::ConnectionSource;
use crate::error::KakaoError;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Kakao OAuth token endpoint.
pub const TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

/// Resolves and caches the access token for one invocation.
pub struct TokenProvider {
    token_override: Option<String>,
    conn_id: Option<String>,
    source: Arc<dyn ConnectionSource>,
    client: reqwest::Client,
    token_url: String,
    cached: OnceCell<String>,
}

impl TokenProvider {
    pub fn new(
        source: Arc<dyn ConnectionSource>,
        conn_id: Option<String>,
        token_override: Option<String>,
    ) -> Self {
        Self::with_token_url(source, conn_id, token_override, TOKEN_URL.to_string())
    }

    /// Like [`TokenProvider::new`] with a custom token endpoint (tests,
    /// self-hosted gateways).
    pub fn with_token_url(
        source: Arc<dyn ConnectionSource>,
        conn_id: Option<String>,
        token_override: Option<String>,
        token_url: String,
    ) -> Self {
        Self {
            token_override,
            conn_id,
            source,
            client: reqwest::Client::new(),
            token_url,
            cached: OnceCell::new(),
        }
    }

    /// Return the access token: the override when given, else the memoized
    /// result of one refresh-token exchange.
    pub async fn access_token(&self) -> Result<String, KakaoError> {
        if let Some(token) = &self.token_override {
            return Ok(token.clone());
        }
        self.cached
            .get_or_try_init(|| self.refresh())
            .await
            .map(|t| t.clone())
    }

    /// Exchange the stored refresh token for a fresh access token.
    async fn refresh(&self) -> Result<String, KakaoError> {
        let conn_id = self.conn_id.as_deref().ok_or_else(|| {
            KakaoError::AuthConfig("no kakao connection id supplied".to_string())
        })?;

        let conn = self
            .source
            .lookup(conn_id)
            .await
            .map_err(KakaoError::AuthConfig)?;

        let client_id = conn.login.as_deref().filter(|s| !s.is_empty());
        let refresh_token = conn.password.as_deref().filter(|s| !s.is_empty());
        let (client_id, refresh_token) = match (client_id, refresh_token) {
            (Some(id), Some(rt)) => (id, rt),
            _ => {
                return Err(KakaoError::AuthConfig(
                    "connection is missing the REST API key (login) or refresh token (password)"
                        .to_string(),
                ))
            }
        };

        let mut form = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", client_id.to_string()),
            ("refresh_token", refresh_token.to_string()),
        ];
        if let Some(secret) = conn.extra_str("client_secret") {
            form.push(("client_secret", secret));
        }

        log::info!("refreshing kakao access token");
        let res = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(&form)
            .send()
            .await
            .map_err(|e| KakaoError::TokenRefresh(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(KakaoError::TokenRefresh(format!("{} {}", status, body)));
        }

        let tokens: serde_json::Value = res
            .json()
            .await
            .map_err(|e| KakaoError::TokenRefresh(e.to_string()))?;
        let access_token = tokens
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                KakaoError::TokenRefresh("no access_token in response".to_string())
            })?;

        if tokens.get("refresh_token").and_then(|v| v.as_str()).is_some() {
            log::warn!("kakao refresh token rotated; new value is not persisted");
        }

        Ok(access_token.to_string())
    }
}
