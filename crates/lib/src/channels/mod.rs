//! Messaging channel connectors (KakaoTalk).
//!
//! A channel owns its HTTP client and endpoints and exposes a send call the
//! host (or the CLI) drives directly.

mod kakao;

pub use kakao::{Endpoints, KakaoChannel, SEND_FRIEND_URL, SEND_ME_URL};
