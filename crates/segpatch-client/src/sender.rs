//! Patch transport
//!
//! [`PatchSender`] is the seam between the edit flow and the network.
//! [`HttpPatchSender`] issues the PATCH with reqwest.

use crate::config::PatchClientConfig;
use crate::error::PatchError;
use async_trait::async_trait;
use segpatch_core::{Identifier, PatchPayload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Successful PATCH response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchResponse {
    /// HTTP status code
    pub status: u16,

    /// Decoded body, if any
    ///
    /// A body that is not JSON is kept verbatim as a JSON string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Sends a batch of instructions for one segment
#[async_trait]
pub trait PatchSender: Send + Sync {
    /// Apply `payload` to `segment`
    ///
    /// # Errors
    /// Returns [`PatchError`] if the request fails or is rejected.
    async fn send_patch(
        &self,
        segment: &Identifier,
        payload: &PatchPayload,
    ) -> Result<PatchResponse, PatchError>;
}

#[async_trait]
impl<T: PatchSender + ?Sized> PatchSender for Arc<T> {
    async fn send_patch(
        &self,
        segment: &Identifier,
        payload: &PatchPayload,
    ) -> Result<PatchResponse, PatchError> {
        (**self).send_patch(segment, payload).await
    }
}

/// reqwest-backed [`PatchSender`]
#[derive(Debug, Clone)]
pub struct HttpPatchSender {
    client: reqwest::Client,
    config: PatchClientConfig,
}

impl HttpPatchSender {
    /// Create sender from validated configuration
    ///
    /// # Errors
    /// Returns [`PatchError::Config`] if the configuration is invalid and
    /// [`PatchError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: PatchClientConfig) -> Result<Self, PatchError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Create sender around a preconfigured reqwest client
    ///
    /// `timeout_secs` is not applied; the client's own settings win.
    ///
    /// # Errors
    /// Returns [`PatchError::Config`] if the configuration is invalid.
    pub fn with_client(
        config: PatchClientConfig,
        client: reqwest::Client,
    ) -> Result<Self, PatchError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PatchClientConfig {
        &self.config
    }
}

#[async_trait]
impl PatchSender for HttpPatchSender {
    async fn send_patch(
        &self,
        segment: &Identifier,
        payload: &PatchPayload,
    ) -> Result<PatchResponse, PatchError> {
        let url = self.config.segment_url(segment)?;
        tracing::debug!(%url, instructions = payload.instructions.len(), "sending patch");

        let mut request = self
            .client
            .patch(url)
            .query(&self.config.scope_query())
            .json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&text, status.canonical_reason());
            tracing::warn!(status = status.as_u16(), %message, "patch rejected");
            return Err(PatchError::rejected(status.as_u16(), message));
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::debug!(%err, "success body is not JSON, keeping raw text");
                serde_json::Value::String(text)
            }))
        };
        Ok(PatchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pull a human readable message out of an error response body
///
/// Looks at `error`, `message` and `responseMessages[0].message` in that
/// order, then falls back to the raw body, then to `fallback`.
#[must_use]
pub fn extract_error_message(body: &str, fallback: Option<&str>) -> String {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.get("error"),
            value.get("message"),
            value
                .get("responseMessages")
                .and_then(|m| m.get(0))
                .and_then(|m| m.get("message")),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str)
            .find_map(non_empty)
        {
            return message;
        }
    }

    non_empty(body)
        .or_else(|| fallback.and_then(non_empty))
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_prefers_error_field() {
        let body = r#"{"error":"segment locked","message":"ignored"}"#;
        assert_eq!(extract_error_message(body, None), "segment locked");
    }

    #[test]
    fn extract_message_field() {
        let body = r#"{"code":"INVALID_REQUEST","message":"clause c9 not found"}"#;
        assert_eq!(extract_error_message(body, None), "clause c9 not found");
    }

    #[test]
    fn extract_response_messages() {
        let body = r#"{"responseMessages":[{"level":"ERROR","message":"no access"}]}"#;
        assert_eq!(extract_error_message(body, None), "no access");
    }

    #[test]
    fn extract_skips_empty_strings() {
        let body = r#"{"error":"","message":"real one"}"#;
        assert_eq!(extract_error_message(body, None), "real one");
    }

    #[test]
    fn extract_raw_body() {
        assert_eq!(extract_error_message("gateway timeout\n", None), "gateway timeout");
    }

    #[test]
    fn extract_fallbacks() {
        assert_eq!(extract_error_message("", Some("Bad Request")), "Bad Request");
        assert_eq!(extract_error_message("  ", None), "unknown error");
        assert_eq!(extract_error_message("{}", None), "{}");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = PatchClientConfig::new()
            .with_scope("acc", "org", "proj", "prod")
            .with_api_key("top-secret");
        let sender = HttpPatchSender::new(config).unwrap();
        assert!(!format!("{sender:?}").contains("top-secret"));
    }

    #[test]
    fn http_sender_rejects_invalid_config() {
        let err = HttpPatchSender::new(PatchClientConfig::default()).unwrap_err();
        assert!(matches!(err, PatchError::Config(_)));
    }
}
