use std::{collections::HashMap, fs};

use anyhow::Context;
use chain_client::{DEFAULT_SEPOLIA_RPC_URL, SEPOLIA_CHAIN_ID};
use frame_hub::DEFAULT_HUB_URL;
use url::Url;

pub const DEFAULT_PUBLIC_HOST: &str = "http://localhost:3000";
pub const PULPA_TOKEN_SEPOLIA_ADDRESS: &str = "0x029263aa1be88127f1794780d9eef453221c2f30";
pub const DEFAULT_MINT_RECIPIENT: &str = "0xF54f4815f62ccC360963329789d62d3497A121Ae";

const SETTINGS_FILE: &str = "frame.toml";

pub struct Settings {
    pub server_bind: String,
    pub public_host: String,
    pub hub_url: String,
    pub neynar_api_key: Option<String>,
    pub minter_private_key: Option<String>,
    pub rpc_url: String,
    pub chain_id: u64,
    pub token_address: String,
    pub mint_recipient: String,
    pub mint_amount: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            public_host: DEFAULT_PUBLIC_HOST.into(),
            hub_url: DEFAULT_HUB_URL.into(),
            neynar_api_key: None,
            minter_private_key: None,
            rpc_url: DEFAULT_SEPOLIA_RPC_URL.into(),
            chain_id: SEPOLIA_CHAIN_ID,
            token_address: PULPA_TOKEN_SEPOLIA_ADDRESS.into(),
            mint_recipient: DEFAULT_MINT_RECIPIENT.into(),
            mint_amount: 1,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_with(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `frame.toml`, then the environment. Later `APP__*`
/// variables win over the plain names.
pub fn load_settings_with(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) {
            let get = |key: &str| file_cfg.get(key).map(toml_value_to_string);
            if let Some(v) = get("bind_addr") {
                settings.server_bind = v;
            }
            if let Some(v) = get("public_host") {
                settings.public_host = v;
            }
            if let Some(v) = get("hub_url") {
                settings.hub_url = v;
            }
            if let Some(v) = get("rpc_url") {
                settings.rpc_url = v;
            }
            if let Some(v) = get("chain_id").and_then(|v| v.parse().ok()) {
                settings.chain_id = v;
            }
            if let Some(v) = get("token_address") {
                settings.token_address = v;
            }
            if let Some(v) = get("mint_recipient") {
                settings.mint_recipient = v;
            }
            if let Some(v) = get("mint_amount").and_then(|v| v.parse().ok()) {
                settings.mint_amount = v;
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("NEXT_PUBLIC_HOST") {
        settings.public_host = v;
    }
    if let Some(v) = env("APP__PUBLIC_HOST") {
        settings.public_host = v;
    }

    if let Some(v) = env("HUB_URL") {
        settings.hub_url = v;
    }
    if let Some(v) = env("NEYNAR_API_KEY").filter(|v| !v.trim().is_empty()) {
        settings.neynar_api_key = Some(v);
    }

    if let Some(v) = env("MINTER_PRIVATE_KEY").filter(|v| !v.trim().is_empty()) {
        settings.minter_private_key = Some(v);
    }

    if let Some(v) = env("SEPOLIA_RPC_URL") {
        settings.rpc_url = v;
    }
    if let Some(v) = env("APP__RPC_URL") {
        settings.rpc_url = v;
    }

    if let Some(v) = env("PULPA_TOKEN_ADDRESS") {
        settings.token_address = v;
    }
    if let Some(v) = env("MINT_RECIPIENT") {
        settings.mint_recipient = v;
    }

    settings
}

fn toml_value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Base URL used for post targets and the debug link.
pub fn prepare_public_host(raw_host: &str) -> anyhow::Result<Url> {
    let host = normalize_public_host(raw_host);
    let url = Url::parse(&host).with_context(|| format!("invalid public host '{host}'"))?;
    if url.host().is_none() || url.cannot_be_a_base() {
        anyhow::bail!("public host '{host}' has no host name");
    }
    Ok(url)
}

fn normalize_public_host(raw_host: &str) -> String {
    let raw_host = raw_host.trim();

    if raw_host.is_empty() {
        return DEFAULT_PUBLIC_HOST.to_string();
    }

    if let Some((scheme, rest)) = raw_host.split_once("://") {
        return format!("{scheme}://{}", rest.trim_end_matches('/'));
    }

    format!("https://{}", raw_host.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
