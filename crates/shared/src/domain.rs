use serde::{Deserialize, Serialize};

use crate::error::FrameError;

pub const TOTAL_PAGES: u8 = 5;

/// Index of the final "claim" page.
pub const CLAIM_PAGE: u8 = TOTAL_PAGES - 1;

pub const BUTTON_BACK: u32 = 1;
pub const BUTTON_FORWARD: u32 = 2;

/// Which carousel page is shown. Rebuilt on every request from the state the
/// previous frame carried; `page_index` is always below [`TOTAL_PAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCarouselState")]
pub struct CarouselState {
    page_index: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCarouselState {
    page_index: i64,
}

impl TryFrom<RawCarouselState> for CarouselState {
    type Error = FrameError;

    fn try_from(raw: RawCarouselState) -> Result<Self, Self::Error> {
        u8::try_from(raw.page_index)
            .ok()
            .and_then(CarouselState::new)
            .ok_or(FrameError::PageOutOfRange(raw.page_index))
    }
}

impl CarouselState {
    pub fn new(page_index: u8) -> Option<Self> {
        (page_index < TOTAL_PAGES).then_some(Self { page_index })
    }

    pub fn page_index(self) -> u8 {
        self.page_index
    }

    pub fn is_splash(self) -> bool {
        self.page_index == 0
    }

    pub fn is_claim_page(self) -> bool {
        self.page_index == CLAIM_PAGE
    }

    /// Parses the serialized state carried in a frame URL. `None` means a
    /// first visit.
    pub fn from_query(raw: Option<&str>) -> Result<Self, FrameError> {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|e| FrameError::InvalidState(e.to_string()))
            }
        }
    }

    /// Inverse of [`CarouselState::from_query`].
    pub fn to_query(self) -> String {
        // Serializing a single integer field cannot fail.
        serde_json::to_string(&self).unwrap_or_default()
    }
}

/// The navigation input of one interaction. Anything but 1 or 2 is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionAction {
    pub button_index: Option<u32>,
}

impl InteractionAction {
    pub fn button(button_index: u32) -> Self {
        Self {
            button_index: Some(button_index),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

pub fn transition(state: CarouselState, action: &InteractionAction) -> CarouselState {
    if state.is_splash() {
        return CarouselState { page_index: 1 };
    }
    if state.is_claim_page() && action.button_index == Some(BUTTON_BACK) {
        return CarouselState::default();
    }

    let page_index = match action.button_index {
        Some(BUTTON_FORWARD) => (state.page_index + 1) % TOTAL_PAGES,
        // Never wraps below zero in practice: page 0 always advances above.
        Some(BUTTON_BACK) => (state.page_index + TOTAL_PAGES - 1) % TOTAL_PAGES,
        _ => state.page_index,
    };
    CarouselState { page_index }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
