use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),
}

/// Run configuration, loaded once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_user: String,
    pub api_password: String,
    pub source_dir: PathBuf,
    pub group_name: String,
    pub template_id: String,
    pub proxy_id: String,
    pub strict_names: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required("HOSTSYNC_API_URL")?,
            api_user: required("HOSTSYNC_API_USER")?,
            api_password: required("HOSTSYNC_API_PASSWORD")?,
            source_dir: PathBuf::from(required("HOSTSYNC_SOURCE_DIR")?),
            group_name: required("HOSTSYNC_GROUP_NAME")?,
            template_id: required("HOSTSYNC_TEMPLATE_ID")?,
            proxy_id: required("HOSTSYNC_PROXY_ID")?,
            strict_names: env::var("HOSTSYNC_STRICT_NAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            log_level: env::var("HOSTSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}
