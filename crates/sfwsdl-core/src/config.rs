use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the cached WSDL under the XDG data dir when `wsdl_path` is unset.
pub const DEFAULT_WSDL_FILE: &str = "salesforce.wsdl";

/// HTTP settings for the WSDL request (optional `[http]` section; every key optional).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole request, body included.
    pub timeout_secs: u64,
    /// Replaces `https://{instance}.salesforce.com` when set (e.g. a proxy).
    pub base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
            base_url: None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session of an already logged-in API client (optional `[session]` section).
/// Environment variables take precedence, see [`crate::session::Session::resolve`].
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub server_instance: Option<String>,
}

// The config is logged at debug level; the token must not end up there.
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_id", &self.session_id.as_ref().map(|_| "<redacted>"))
            .field("server_instance", &self.server_instance)
            .finish()
    }
}

/// Global configuration loaded from `~/.config/sfwsdl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SfwsdlConfig {
    /// Where the WSDL is written. Defaults to `~/.local/share/sfwsdl/salesforce.wsdl`.
    #[serde(default)]
    pub wsdl_path: Option<PathBuf>,
    /// Command line run after a successful refresh, e.g. `["php", "bin/console", "cache:clear"]`.
    #[serde(default)]
    pub cache_clear_command: Option<Vec<String>>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub session: Option<SessionConfig>,
}

impl SfwsdlConfig {
    /// Destination path of the WSDL: the configured one or the XDG data default.
    pub fn resolve_wsdl_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.wsdl_path {
            return Ok(path.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sfwsdl")?;
        xdg_dirs
            .place_data_file(DEFAULT_WSDL_FILE)
            .context("failed to create data directory for the WSDL")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sfwsdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SfwsdlConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<SfwsdlConfig> {
    if !path.exists() {
        let default_cfg = SfwsdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: SfwsdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
