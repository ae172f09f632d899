use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::domain::NetworkId;
use tracing::warn;

pub const SETTINGS_FILE: &str = "wallet.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub app_name: String,
    pub default_network: NetworkId,
    pub network_rebind_timeout_ms: u64,
    pub event_buffer: usize,
    /// Raw adapter statuses treated as settled. Empty keeps every reported
    /// status open for another manual refresh.
    pub finalized_statuses: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            app_name: "Aleo Transfer".into(),
            default_network: NetworkId::Mainnet,
            network_rebind_timeout_ms: 5_000,
            event_buffer: 256,
            finalized_statuses: Vec::new(),
        }
    }
}

impl ClientSettings {
    pub fn network_rebind_timeout(&self) -> Duration {
        Duration::from_millis(self.network_rebind_timeout_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    app_name: Option<String>,
    default_network: Option<String>,
    network_rebind_timeout_ms: Option<u64>,
    event_buffer: Option<usize>,
    finalized_statuses: Option<Vec<String>>,
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then `APP__*` environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    if let Some(v) = env("APP__APP_NAME") {
        settings.app_name = v;
    }

    if let Some(v) = env("WALLET_NETWORK") {
        set_network(&mut settings, &v);
    }
    if let Some(v) = env("APP__DEFAULT_NETWORK") {
        set_network(&mut settings, &v);
    }

    if let Some(v) = env("APP__NETWORK_REBIND_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.network_rebind_timeout_ms = parsed;
        }
    }

    if let Some(v) = env("APP__EVENT_BUFFER") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.event_buffer = parsed.max(1);
        }
    }

    if let Some(v) = env("APP__FINALIZED_STATUSES") {
        settings.finalized_statuses = split_list(&v);
    }

    settings
}

fn apply_file(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.app_name {
        settings.app_name = v;
    }
    if let Some(v) = file_cfg.default_network {
        set_network(settings, &v);
    }
    if let Some(v) = file_cfg.network_rebind_timeout_ms {
        settings.network_rebind_timeout_ms = v;
    }
    if let Some(v) = file_cfg.event_buffer {
        settings.event_buffer = v.max(1);
    }
    if let Some(v) = file_cfg.finalized_statuses {
        settings.finalized_statuses = v;
    }
}

fn set_network(settings: &mut ClientSettings, raw: &str) {
    match raw.parse::<NetworkId>() {
        Ok(network) => settings.default_network = network,
        Err(err) => warn!("keeping default network: {err}"),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
