//! Frame action verification against a Farcaster hub.
//!
//! The hub checks the message signature; this crate only ships the signed
//! bytes to it and maps the answer onto [`FrameMessage`].

use alloy_primitives::hex;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::protocol::{CastId, FrameActionPayload, FrameMessage};
use thiserror::Error;
use tracing::debug;

/// Seconds between the Unix epoch and the Farcaster epoch (2021-01-01T00:00:00Z).
pub const FARCASTER_EPOCH: i64 = 1_609_459_200;

pub const DEFAULT_HUB_URL: &str = "https://hub-api.neynar.com";

const VALIDATE_MESSAGE_PATH: &str = "/v1/validateMessage";

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("frame payload has no trusted message bytes")]
    MissingMessageBytes,
    #[error("trusted message bytes are not valid hex: {0}")]
    InvalidMessageBytes(#[from] hex::FromHexError),
    #[error("hub request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("hub responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("hub response could not be decoded: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

#[async_trait]
pub trait FrameMessageVerifier: Send + Sync {
    async fn verify(&self, payload: &FrameActionPayload) -> Result<FrameMessage, VerifyError>;
}

#[derive(Debug, Clone)]
pub struct HubConfig {
    pub hub_url: String,
    pub api_key: Option<String>,
}

/// Verifies frame messages against a hub's `validateMessage` endpoint.
///
/// Only the message itself is checked. Hub context about the interactor
/// (likes, recasts, follows, verified addresses) is not fetched, since no
/// frame depends on it.
#[derive(Clone)]
pub struct HubVerifier {
    http: reqwest::Client,
    config: HubConfig,
}

impl HubVerifier {
    pub fn new(config: HubConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: HubConfig) -> Self {
        Self { http, config }
    }

    fn validate_url(&self) -> String {
        format!(
            "{}{VALIDATE_MESSAGE_PATH}",
            self.config.hub_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl FrameMessageVerifier for HubVerifier {
    async fn verify(&self, payload: &FrameActionPayload) -> Result<FrameMessage, VerifyError> {
        let message_bytes = payload.trusted_data.message_bytes.trim();
        if message_bytes.is_empty() {
            return Err(VerifyError::MissingMessageBytes);
        }
        let message_bytes = hex::decode(message_bytes)?;

        let mut request = self
            .http
            .post(self.validate_url())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(message_bytes);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("api_key", api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(VerifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let validation: ValidateMessageResponse = serde_json::from_str(&body)?;
        debug!(valid = validation.valid, "hub validated frame message");
        Ok(validation.into_frame_message())
    }
}

#[derive(Debug, Deserialize)]
struct ValidateMessageResponse {
    valid: bool,
    #[serde(default)]
    message: Option<HubMessage>,
}

#[derive(Debug, Deserialize)]
struct HubMessage {
    data: HubMessageData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HubMessageData {
    #[serde(default)]
    fid: Option<u64>,
    /// Seconds since the Farcaster epoch.
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    frame_action_body: Option<FrameActionBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameActionBody {
    #[serde(default)]
    button_index: Option<u32>,
    #[serde(default)]
    cast_id: Option<CastId>,
    /// Base64 of the UTF-8 text.
    #[serde(default)]
    input_text: Option<String>,
}

impl ValidateMessageResponse {
    fn into_frame_message(self) -> FrameMessage {
        let Some(message) = self.message else {
            return FrameMessage {
                is_valid: self.valid,
                ..FrameMessage::invalid()
            };
        };

        let data = message.data;
        let body = data.frame_action_body;
        let (button_index, cast_id, input_text) = match body {
            Some(body) => (
                body.button_index,
                body.cast_id,
                body.input_text.as_deref().and_then(decode_input_text),
            ),
            None => (None, None, None),
        };

        FrameMessage {
            is_valid: self.valid,
            fid: data.fid,
            button_index,
            input_text,
            cast_id,
            timestamp: data.timestamp.and_then(farcaster_time_to_utc),
        }
    }
}

fn decode_input_text(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    (!text.is_empty()).then_some(text)
}

pub fn farcaster_time_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(FARCASTER_EPOCH.checked_add(seconds)?, 0)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
