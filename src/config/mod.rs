use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::wallet::{NetworkRegistry, DEFAULT_AUTO_CLOSE};

pub const DEFAULT_INSTALL_URL: &str = "https://metamask.io/download/";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSpec {
    pub chain_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalletSettings {
    pub auto_close_ms: u64,
    pub poll_interval_ms: u64,
    pub install_url: String,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            auto_close_ms: DEFAULT_AUTO_CLOSE.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            install_url: DEFAULT_INSTALL_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    #[serde(default)]
    pub wallet: WalletSettings,

    #[serde(default)]
    pub networks: Vec<NetworkSpec>,
}

impl Config {
    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.wallet.auto_close_ms)
    }

    /// Zero is clamped so the watcher never spins
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.wallet.poll_interval_ms.max(100))
    }

    pub fn install_url(&self) -> &str {
        let url = self.wallet.install_url.trim();
        if url.is_empty() {
            DEFAULT_INSTALL_URL
        } else {
            url
        }
    }

    pub fn network_registry(&self) -> NetworkRegistry {
        NetworkRegistry::with_overrides(
            self.networks
                .iter()
                .map(|network| (network.chain_id.as_str(), network.name.clone())),
        )
    }
}

pub fn parse(content: &str) -> Config {
    toml::from_str::<Config>(content).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring invalid config");
        Config::default()
    })
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("WALLETBAR_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("walletbar").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("walletbar").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "walletbar", "walletbar")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("walletbar"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("walletbar"));
    }
    directories::ProjectDirs::from("io", "walletbar", "walletbar")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("walletbar.log"))
}
