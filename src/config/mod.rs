use crate::errors::{AppError, AppResult};
use crate::sync::SyncSettings;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Largest `limit` the server accepts on its list endpoints.
const MAX_REFRESH_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
    #[serde(default = "default_reconnect_debounce_ms")]
    pub reconnect_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_limit")]
    pub refresh_limit: usize,
    #[serde(default = "default_max_recent_errors")]
    pub max_recent_errors: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_health_path() -> String {
    "/health".to_string()
}
fn default_sync_interval_secs() -> u64 {
    300
}
fn default_reconnect_debounce_ms() -> u64 {
    2000
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_refresh_limit() -> usize {
    50
}
fn default_max_recent_errors() -> usize {
    20
}

/// `~/x` → `$HOME/x`; anything else is returned as is.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            api_base_url: default_api_base_url(),
            api_token: None,
            health_path: default_health_path(),
            sync_interval_secs: default_sync_interval_secs(),
            reconnect_debounce_ms: default_reconnect_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_limit: default_refresh_limit(),
            max_recent_errors: default_max_recent_errors(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skatesync")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("skatesync.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("skatesync.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Absolute URL of the connectivity probe.
    ///
    /// The health endpoint lives at the server root, so `health_path` is
    /// resolved against the origin of `api_base_url`, not its `/api` prefix.
    pub fn health_url(&self) -> String {
        let path = format!("/{}", self.health_path.trim_start_matches('/'));
        match Url::parse(&self.api_base_url).and_then(|base| base.join(&path)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.api_base_url.trim_end_matches('/'), path),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            sync_interval: Duration::from_secs(self.sync_interval_secs.max(1)),
            reconnect_debounce: Duration::from_millis(self.reconnect_debounce_ms),
            refresh_limit: self.refresh_limit.clamp(1, MAX_REFRESH_LIMIT),
            max_recent_errors: self.max_recent_errors,
            ..SyncSettings::default()
        }
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).or_else(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Ok(()),
                _ => Err(e),
            })?;
        }

        Ok(config)
    }
}
