//! Message params and payload resolution.
//!
//! Params carry either free text or a pre-built template object; the branch
//! is resolved once into a [`MessagePayload`] before any HTTP call.

use crate::error::KakaoError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Kakao caps the friend-send API at 5 receivers per call.
pub const RECEIVER_CHUNK_SIZE: usize = 5;

/// Link URL used when a text message gives none.
pub const DEFAULT_WEB_URL: &str = "http://localhost:8080";

/// Message content parameters. Exactly one of `text` or `template_object`
/// must be present; `template_object` wins when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageParams {
    /// Plain text message body.
    pub text: Option<String>,
    /// Pre-built Kakao template object (feed, list, commerce, ...). May be
    /// a structured object or a JSON-encoded string of one.
    pub template_object: Option<serde_json::Value>,
    /// Link URL for text messages (default http://localhost:8080).
    pub web_url: Option<String>,
    /// Mobile link URL for text messages (defaults to `web_url`).
    pub mobile_web_url: Option<String>,
}

/// Payload kind, resolved once before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    /// Simple text message with link URLs.
    Text {
        text: String,
        web_url: String,
        mobile_web_url: String,
    },
    /// Custom template object, used verbatim.
    Template(serde_json::Value),
}

impl MessagePayload {
    /// Resolve params into a payload. No network activity; fails with
    /// `InvalidMessage` when neither text nor template is usable.
    pub fn from_params(params: &MessageParams) -> Result<Self, KakaoError> {
        if let Some(template) = &params.template_object {
            // A string-valued template is a JSON-encoded object; parse it.
            let template = match template {
                serde_json::Value::String(s) => serde_json::from_str(s).map_err(|e| {
                    KakaoError::InvalidMessage(format!(
                        "template_object is not valid JSON: {}",
                        e
                    ))
                })?,
                other => other.clone(),
            };
            return Ok(MessagePayload::Template(template));
        }
        if let Some(text) = &params.text {
            let web_url = params
                .web_url
                .clone()
                .unwrap_or_else(|| DEFAULT_WEB_URL.to_string());
            let mobile_web_url = params.mobile_web_url.clone().unwrap_or_else(|| web_url.clone());
            return Ok(MessagePayload::Text {
                text: text.clone(),
                web_url,
                mobile_web_url,
            });
        }
        Err(KakaoError::InvalidMessage(
            "must contain 'text' or 'template_object'".to_string(),
        ))
    }

    /// Template object as sent on the wire.
    pub fn to_template_object(&self) -> serde_json::Value {
        match self {
            MessagePayload::Text {
                text,
                web_url,
                mobile_web_url,
            } => json!({
                "object_type": "text",
                "text": text,
                "link": {
                    "web_url": web_url,
                    "mobile_web_url": mobile_web_url,
                },
            }),
            MessagePayload::Template(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_payload_defaults_both_link_urls() {
        let params = MessageParams {
            text: Some("hello".to_string()),
            ..Default::default()
        };
        let payload = MessagePayload::from_params(&params).expect("payload");
        assert_eq!(
            payload.to_template_object(),
            json!({
                "object_type": "text",
                "text": "hello",
                "link": {
                    "web_url": "http://localhost:8080",
                    "mobile_web_url": "http://localhost:8080",
                },
            })
        );
    }

    #[test]
    fn mobile_web_url_falls_back_to_web_url() {
        let params = MessageParams {
            text: Some("deploy done".to_string()),
            web_url: Some("https://example.com/run/42".to_string()),
            ..Default::default()
        };
        let payload = MessagePayload::from_params(&params).expect("payload");
        let obj = payload.to_template_object();
        assert_eq!(obj["link"]["web_url"], "https://example.com/run/42");
        assert_eq!(obj["link"]["mobile_web_url"], "https://example.com/run/42");
    }

    #[test]
    fn structured_template_used_verbatim() {
        let template = json!({
            "object_type": "feed",
            "content": {"title": "Daily Report"},
        });
        let params = MessageParams {
            template_object: Some(template.clone()),
            text: Some("ignored".to_string()),
            ..Default::default()
        };
        let payload = MessagePayload::from_params(&params).expect("payload");
        // template wins over text
        assert_eq!(payload.to_template_object(), template);
    }

    #[test]
    fn string_template_is_parsed_first() {
        let params = MessageParams {
            template_object: Some(serde_json::Value::String(
                r#"{"object_type":"list","items":[1,2]}"#.to_string(),
            )),
            ..Default::default()
        };
        let payload = MessagePayload::from_params(&params).expect("payload");
        assert_eq!(
            payload.to_template_object(),
            json!({"object_type": "list", "items": [1, 2]})
        );
    }

    #[test]
    fn malformed_string_template_is_invalid() {
        let params = MessageParams {
            template_object: Some(serde_json::Value::String("{not json".to_string())),
            ..Default::default()
        };
        let err = MessagePayload::from_params(&params).unwrap_err();
        assert!(matches!(err, KakaoError::InvalidMessage(_)));
    }

    #[test]
    fn empty_params_are_invalid() {
        let err = MessagePayload::from_params(&MessageParams::default()).unwrap_err();
        match err {
            KakaoError::InvalidMessage(msg) => {
                assert!(msg.contains("'text' or 'template_object'"))
            }
            other => panic!("expected InvalidMessage, got {:?}", other),
        }
    }
}
