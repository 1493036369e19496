use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPayload,
    InvalidState,
    Upstream,
}

/// Everything that sends a request to the generic failure frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Invalid frame payload")]
    InvalidPayload,
    #[error("malformed frame payload: {0}")]
    MalformedPayload(String),
    #[error("invalid carousel state: {0}")]
    InvalidState(String),
    #[error("page index {0} is out of range")]
    PageOutOfRange(i64),
    #[error("frame verification failed: {0}")]
    Verification(String),
}

impl FrameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPayload | Self::MalformedPayload(_) => ErrorCode::InvalidPayload,
            Self::InvalidState(_) | Self::PageOutOfRange(_) => ErrorCode::InvalidState,
            Self::Verification(_) => ErrorCode::Upstream,
        }
    }
}
