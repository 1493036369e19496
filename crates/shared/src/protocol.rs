use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::InteractionAction, error::FrameError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastId {
    pub fid: u64,
    pub hash: String,
}

/// Client-reported half of a frame action. Nothing here is authenticated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub network: Option<u32>,
    #[serde(default)]
    pub button_index: Option<u32>,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub cast_id: Option<CastId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedData {
    /// Hex encoded signed protobuf message.
    #[serde(default)]
    pub message_bytes: String,
}

/// Body of a frame POST.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameActionPayload {
    #[serde(default)]
    pub untrusted_data: UntrustedData,
    #[serde(default)]
    pub trusted_data: TrustedData,
}

impl FrameActionPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, FrameError> {
        serde_json::from_slice(body).map_err(|e| FrameError::MalformedPayload(e.to_string()))
    }

    pub fn action(&self) -> InteractionAction {
        InteractionAction {
            button_index: self.untrusted_data.button_index,
        }
    }
}

/// A frame action after the hub has checked its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMessage {
    pub is_valid: bool,
    pub fid: Option<u64>,
    pub button_index: Option<u32>,
    pub input_text: Option<String>,
    pub cast_id: Option<CastId>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl FrameMessage {
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            fid: None,
            button_index: None,
            input_text: None,
            cast_id: None,
            timestamp: None,
        }
    }
}
