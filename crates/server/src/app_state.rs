use std::sync::Arc;

use chain_client::ChainClient;
use frame_hub::FrameMessageVerifier;
use url::Url;

use crate::mint::MintSettings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) host: Url,
    pub(crate) verifier: Arc<dyn FrameMessageVerifier>,
    pub(crate) chain: Arc<dyn ChainClient>,
    pub(crate) mint: MintSettings,
}
