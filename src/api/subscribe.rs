use serde::{Deserialize, Serialize};

use crate::error::SubscribeError;

pub const SUBSCRIBING_TEXT: &str = "subscribing...";
pub const SUBSCRIBED_TEXT: &str = "✓ subscribed! check your email";
pub const SUBSCRIBE_FAILED_TEXT: &str = "error - try again";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscribeResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Inline status shown under the subscribe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeStatus {
    Subscribing,
    Subscribed,
    Failed(String),
}

impl SubscribeStatus {
    /// Project an HTTP outcome. 2xx always reads as success; otherwise the
    /// server message is surfaced verbatim when there is one.
    pub fn from_response(ok: bool, body: Option<SubscribeResponse>) -> Self {
        if ok {
            return SubscribeStatus::Subscribed;
        }
        let message = body
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| SUBSCRIBE_FAILED_TEXT.to_string());
        SubscribeStatus::Failed(message)
    }

    pub fn from_error(_err: &SubscribeError) -> Self {
        SubscribeStatus::Failed(SUBSCRIBE_FAILED_TEXT.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            SubscribeStatus::Subscribing => SUBSCRIBING_TEXT,
            SubscribeStatus::Subscribed => SUBSCRIBED_TEXT,
            SubscribeStatus::Failed(message) => message,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SubscribeStatus::Subscribing => "#666",
            _ => "#000",
        }
    }

    /// The email field is emptied only after a successful subscription.
    pub fn clears_input(&self) -> bool {
        matches!(self, SubscribeStatus::Subscribed)
    }
}

/// POST `{ email }` to the subscribe endpoint.
#[cfg(target_arch = "wasm32")]
pub async fn submit(endpoint: &str, email: &str) -> Result<SubscribeStatus, SubscribeError> {
    let request = gloo_net::http::Request::post(endpoint)
        .json(&SubscribeRequest {
            email: email.to_string(),
        })
        .map_err(|e| SubscribeError::Encode(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| SubscribeError::Network(e.to_string()))?;
    let ok = response.ok();
    let body = response.json::<SubscribeResponse>().await.ok();
    tracing::info!(status = response.status(), ok, "subscribe request finished");
    Ok(SubscribeStatus::from_response(ok, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_clears_input() {
        let status = SubscribeStatus::from_response(true, None);
        assert_eq!(status.text(), SUBSCRIBED_TEXT);
        assert!(status.clears_input());
    }

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let body = SubscribeResponse {
            message: Some("Invalid email".to_string()),
        };
        let status = SubscribeStatus::from_response(false, Some(body));
        assert_eq!(status.text(), "Invalid email");
        assert!(!status.clears_input());
    }

    #[test]
    fn missing_message_uses_default_text() {
        let status = SubscribeStatus::from_response(false, Some(SubscribeResponse::default()));
        assert_eq!(status.text(), SUBSCRIBE_FAILED_TEXT);
        let status = SubscribeStatus::from_error(&SubscribeError::Network("offline".into()));
        assert_eq!(status.text(), SUBSCRIBE_FAILED_TEXT);
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_string(&SubscribeRequest {
            email: "a@b.c".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"email":"a@b.c"}"#);
        assert_eq!(SubscribeStatus::Subscribing.color(), "#666");
    }
}
