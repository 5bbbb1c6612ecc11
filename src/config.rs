use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "DEXSERVE_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub upstream: UpstreamConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Dataset location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default dataset file.
    pub dataset_path: Option<PathBuf>,
}

/// Upstream ability API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Language code of the effect text to serve.
    pub language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            language: "en".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `$DEXSERVE_CONFIG` or
    /// `~/.config/dexserve/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Self {
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved dataset file (override or XDG data dir default).
    pub fn dataset_path(&self) -> PathBuf {
        self.data.dataset_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("dexserve").join("pokemon.json"))
                .unwrap_or_else(|| PathBuf::from("data").join("pokemon.json"))
        })
    }

    /// Address to bind, falling back to localhost if `host` does not parse.
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|e| {
                log::warn!("Invalid server host '{}': {e}; binding 127.0.0.1", self.server.host);
                SocketAddr::from(([127, 0, 0, 1], self.server.port))
            })
    }

    fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("dexserve").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
