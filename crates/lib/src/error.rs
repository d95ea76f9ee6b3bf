//! Connector error kinds. Each maps to a distinct failure stage so callers
//! can tell a config problem from a wire problem.

/// Errors surfaced by the Kakao connector.
#[derive(Debug, thiserror::Error)]
pub enum KakaoError {
    /// Missing connection id, or the stored connection lacks a client id
    /// (login) or refresh token (password). Raised before any HTTP call.
    #[error("kakao auth not configured: {0}")]
    AuthConfig(String),

    /// The refresh-token exchange failed: transport error, non-2xx status,
    /// or no access_token in the response.
    #[error("kakao token refresh failed: {0}")]
    TokenRefresh(String),

    /// Message params carry neither text nor a usable template_object.
    /// Detected before any network activity.
    #[error("invalid message params: {0}")]
    InvalidMessage(String),

    /// A send call failed at the HTTP level. Batches already delivered
    /// stay delivered; remaining batches are not attempted.
    #[error("kakao send failed: {0}")]
    Dispatch(String),
}
