//! Kakao channel: send a message to the authenticated user ("send to me")
//! or to a list of friends, chunked by the API's 5-receiver limit.
//!
//! Batches are sent strictly in order, one HTTP call at a time. A batch
//! response may carry `failure_info` for individual receivers; that is
//! logged as a warning and later batches still go out. An HTTP-level
//! failure stops the sequence; batches already delivered stay delivered.

use crate::auth::{TokenProvider, TOKEN_URL};
use crate::connection::ConnectionSource;
use crate::error::KakaoError;
use crate::message::{MessageParams, MessagePayload, RECEIVER_CHUNK_SIZE};
use std::sync::Arc;

/// Kakao "send to me" endpoint.
pub const SEND_ME_URL: &str = "https://kapi.kakao.com/v2/api/talk/memo/default/send";

/// Kakao "send to friends" endpoint.
pub const SEND_FRIEND_URL: &str =
    "https://kapi.kakao.com/v1/api/talk/friends/message/default/send";

/// Kakao API endpoints. Defaults point at the public Kakao hosts; override
/// for tests or custom gateways.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token_url: String,
    pub send_me_url: String,
    pub send_friend_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            send_me_url: SEND_ME_URL.to_string(),
            send_friend_url: SEND_FRIEND_URL.to_string(),
        }
    }
}

/// Receiver mode, resolved once before dispatch.
enum SendMode<'a> {
    SelfSend,
    Friends(&'a [String]),
}

impl<'a> SendMode<'a> {
    fn resolve(receiver_uuids: Option<&'a [String]>) -> Self {
        match receiver_uuids {
            Some(uuids) if !uuids.is_empty() => SendMode::Friends(uuids),
            _ => SendMode::SelfSend,
        }
    }
}

/// Kakao channel connector: resolves a token lazily and dispatches message
/// payloads to the memo or friends endpoint.
pub struct KakaoChannel {
    tokens: TokenProvider,
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl KakaoChannel {
    pub fn new(
        source: Arc<dyn ConnectionSource>,
        conn_id: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self::with_endpoints(source, conn_id, token, Endpoints::default())
    }

    pub fn with_endpoints(
        source: Arc<dyn ConnectionSource>,
        conn_id: Option<String>,
        token: Option<String>,
        endpoints: Endpoints,
    ) -> Self {
        let tokens = TokenProvider::with_token_url(
            source,
            conn_id,
            token,
            endpoints.token_url.clone(),
        );
        Self {
            tokens,
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    /// Send a message to the authenticated user, or to `receiver_uuids`
    /// (chunked by 5) when given. Returns the parsed response per HTTP call
    /// made, in call order.
    pub async fn send_message(
        &self,
        receiver_uuids: Option<&[String]>,
        params: &MessageParams,
    ) -> Result<Vec<serde_json::Value>, KakaoError> {
        // Payload resolution happens before any network activity.
        let payload = MessagePayload::from_params(params)?;
        let template_json = payload.to_template_object().to_string();

        let token = self.tokens.access_token().await?;
        let mut results = Vec::new();

        match SendMode::resolve(receiver_uuids) {
            SendMode::Friends(uuids) => {
                let batches: Vec<&[String]> = uuids.chunks(RECEIVER_CHUNK_SIZE).collect();
                log::info!(
                    "sending kakao message to {} friends ({} batches)",
                    uuids.len(),
                    batches.len()
                );
                for (idx, batch) in batches.iter().enumerate() {
                    log::info!("batch {}/{} ({} receivers)", idx + 1, batches.len(), batch.len());
                    let receiver_json = serde_json::to_string(batch)
                        .map_err(|e| KakaoError::Dispatch(e.to_string()))?;
                    let form = [
                        ("receiver_uuids", receiver_json.as_str()),
                        ("template_object", template_json.as_str()),
                    ];
                    let result = self
                        .post_send(&self.endpoints.send_friend_url, &token, &form)
                        .await?;
                    if let Some(failed) = result.get("failure_info").filter(|v| !v.is_null()) {
                        log::warn!(
                            "batch {}/{}: some messages failed to send: {}",
                            idx + 1,
                            batches.len(),
                            failed
                        );
                    }
                    results.push(result);
                }
            }
            SendMode::SelfSend => {
                let form = [("template_object", template_json.as_str())];
                let result = self
                    .post_send(&self.endpoints.send_me_url, &token, &form)
                    .await?;
                results.push(result);
            }
        }

        log::info!("all kakao send requests completed");
        Ok(results)
    }

    /// One form-encoded POST with the bearer token; parsed JSON on 2xx.
    async fn post_send(
        &self,
        url: &str,
        token: &str,
        form: &[(&str, &str)],
    ) -> Result<serde_json::Value, KakaoError> {
        let res = self
            .client
            .post(url)
            .bearer_auth(token)
            .form(form)
            .send()
            .await
            .map_err(|e| KakaoError::Dispatch(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(KakaoError::Dispatch(format!("{} {}", status, body)));
        }
        res.json()
            .await
            .map_err(|e| KakaoError::Dispatch(e.to_string()))
    }
}
