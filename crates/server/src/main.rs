use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Router,
};
use chain_client::RpcChainClient;
use frame_hub::{HubConfig, HubVerifier};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod frames;
mod mint;
mod render;

use app_state::AppState;
use config::{load_settings, prepare_public_host};
use mint::MintSettings;

#[derive(Debug, Deserialize)]
struct FrameQuery {
    state: Option<String>,
}

const MAX_FRAME_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let host = prepare_public_host(&settings.public_host)?;
    let mint = MintSettings::from_settings(&settings)?;
    if mint.private_key.is_none() {
        info!("MINTER_PRIVATE_KEY is not set; claims will not mint");
    }

    let http = reqwest::Client::new();
    let verifier = HubVerifier::with_client(
        http.clone(),
        HubConfig {
            hub_url: settings.hub_url.clone(),
            api_key: settings.neynar_api_key.clone(),
        },
    );
    let chain = RpcChainClient::with_client(http, settings.rpc_url.clone(), settings.chain_id);

    let state = AppState {
        host,
        verifier: Arc::new(verifier),
        chain: Arc::new(chain),
        mint,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, host = %settings.public_host, hub = %settings.hub_url, "frame server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(home))
        .route(
            "/frames",
            post(frame_action).layer(RequestBodyLimitLayer::new(MAX_FRAME_BODY_BYTES)),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn home(State(state): State<Arc<AppState>>, Query(q): Query<FrameQuery>) -> Html<String> {
    let view = frames::initial_frame(q.state.as_deref());
    Html(render::render_html(&view, &state.host))
}

async fn frame_action(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FrameQuery>,
    body: Bytes,
) -> Html<String> {
    let view = frames::frame_action(&state, q.state.as_deref(), &body).await;
    Html(render::render_html(&view, &state.host))
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod tests_support;

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
