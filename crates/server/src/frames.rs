use shared::{
    domain::{transition, CarouselState, BUTTON_FORWARD},
    error::FrameError,
    protocol::FrameActionPayload,
};
use tracing::{error, info};

use crate::{
    app_state::AppState,
    mint::{mint_pulpa, MintOutcome},
    render::{self, FrameView},
};

/// "Reclamar $PULPA" sits where "→" is on the other pages.
const CLAIM_BUTTON: u32 = BUTTON_FORWARD;

/// Frame for a plain page load. Nothing is dispatched or verified.
pub(crate) fn initial_frame(raw_state: Option<&str>) -> FrameView {
    match CarouselState::from_query(raw_state) {
        Ok(state) => render::carousel_view(state),
        Err(error) => failure(CarouselState::default(), error),
    }
}

pub(crate) async fn frame_action(
    state: &AppState,
    raw_state: Option<&str>,
    body: &[u8],
) -> FrameView {
    let parsed = CarouselState::from_query(raw_state)
        .and_then(|prior| Ok((prior, FrameActionPayload::from_slice(body)?)));
    let (prior, payload) = match parsed {
        Ok(parsed) => parsed,
        Err(error) => return failure(CarouselState::default(), error),
    };

    let next = transition(prior, &payload.action());
    info!(
        prior = prior.page_index(),
        page_index = next.page_index(),
        button_index = ?payload.untrusted_data.button_index,
        "carousel state"
    );

    match respond(state, prior, next, &payload).await {
        Ok(view) => view,
        Err(error) => failure(next, error),
    }
}

async fn respond(
    state: &AppState,
    prior: CarouselState,
    next: CarouselState,
    payload: &FrameActionPayload,
) -> Result<FrameView, FrameError> {
    let message = state
        .verifier
        .verify(payload)
        .await
        .map_err(|e| FrameError::Verification(e.to_string()))?;
    if !message.is_valid {
        return Err(FrameError::InvalidPayload);
    }
    info!(
        fid = ?message.fid,
        button_index = ?message.button_index,
        cast_fid = ?message.cast_id.as_ref().map(|cast| cast.fid),
        "frame message verified"
    );

    if prior.is_claim_page() && message.button_index == Some(CLAIM_BUTTON) {
        match mint_pulpa(state.chain.as_ref(), &state.mint).await {
            MintOutcome::GasExhausted => return Ok(render::gas_exhausted_view(next)),
            MintOutcome::Submitted(hash) => info!(%hash, fid = ?message.fid, "pulpa claimed"),
            // Non-gas failures produce no frame of their own; fall through.
            MintOutcome::Swallowed => {}
        }
    }

    Ok(render::carousel_view(next))
}

fn failure(state: CarouselState, error: FrameError) -> FrameView {
    error!(code = ?error.code(), %error, "frame request failed");
    render::failure_view(state)
}
