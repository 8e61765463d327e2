use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use syllabix_client::{ClientSettings, ReconnectPolicy, DEFAULT_SERVER_URL};
use syllabix_core::ViewSettings;
use syllabix_logging::{syllabix_info, syllabix_warn, DEFAULT_LOG_FILE};
use thiserror::Error;

use crate::logging::LogTarget;

pub const DEFAULT_CONFIG_FILE: &str = "syllabix.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Contents of `syllabix.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub connect_timeout_ms: u64,
    pub upload_timeout_ms: u64,
    pub animation_ms: u64,
    pub close_grace_ms: u64,
    pub reconnect: ReconnectConfig,
    pub log: LogTarget,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let view = ViewSettings::default();
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout_ms: millis(client.connect_timeout),
            upload_timeout_ms: millis(client.upload_timeout),
            animation_ms: millis(view.animation_duration),
            close_grace_ms: millis(view.close_grace),
            reconnect: ReconnectConfig::default(),
            log: LogTarget::File,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            max_retries: policy.max_retries,
            initial_delay_ms: millis(policy.initial_delay),
            max_delay_ms: millis(policy.max_delay),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            server_url: self.server_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            upload_timeout: Duration::from_millis(self.upload_timeout_ms),
            reconnect: ReconnectPolicy {
                max_retries: self.reconnect.max_retries,
                initial_delay: Duration::from_millis(self.reconnect.initial_delay_ms),
                max_delay: Duration::from_millis(self.reconnect.max_delay_ms),
            },
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            animation_duration: Duration::from_millis(self.animation_ms),
            close_grace: Duration::from_millis(self.close_grace_ms),
        }
    }
}

/// Reads `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_config`], but falls back to defaults on any error.
///
/// Runs before the logger exists, so problems are returned as warnings for
/// the caller to log once logging is up.
pub fn load_or_default(path: &Path) -> (AppConfig, Option<ConfigError>) {
    match load_config(path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}

pub fn report_config(path: &Path, problem: Option<&ConfigError>) {
    match problem {
        Some(err) => syllabix_warn!("{}; using defaults", err),
        None => syllabix_info!("Loaded config from {:?}", path),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
