//! Configuration management and environment variable loading

use crate::demo_data::DEMO_DEFAULT_FOLDER;
use crate::types::default_list_limit;
use crate::{NotebookError, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default base URL of the real backend API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Load environment variables from .env file
///
/// This function loads variables from a .env file in the current directory
/// or a parent directory. A missing file is not an error.
///
/// # Example
///
/// ```no_run
/// use notebook_core::load_env;
///
/// load_env().ok();
/// let demo = std::env::var("NOTEBOOK_DEMO_MODE").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(NotebookError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(NotebookError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(NotebookError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Check that a backend URL is usable
pub fn validate_base_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(NotebookError::config("API base URL cannot be empty"));
    }
    if url.len() > 2048 {
        return Err(NotebookError::config(
            "API base URL is too long (max 2048 characters)",
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(NotebookError::config(format!(
            "Invalid URL format: '{}'. Must start with http:// or https://",
            url
        )));
    }
    Ok(())
}

/// Runtime configuration shared by the runner and the adaptors
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookConfig {
    /// Serve answers from the built-in demo backend
    pub demo_mode: bool,

    /// Base URL of the real backend API
    pub api_base_url: String,

    /// Per-request timeout for real backend calls
    pub request_timeout: Duration,

    /// Connect timeout for real backend calls
    pub connect_timeout: Duration,

    /// JSON knowledge table replacing the built-in one
    pub knowledge_file: Option<PathBuf>,

    /// Folder prefilled for indexing
    pub default_folder: Option<String>,

    /// Page size for document listings
    pub list_limit: usize,

    /// Interval of automatic health refresh in live mode
    pub health_interval: Duration,

    /// Web adaptor bind host
    pub server_host: String,

    /// Web adaptor bind port
    pub server_port: u16,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            demo_mode: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            knowledge_file: None,
            default_folder: Some(DEMO_DEFAULT_FOLDER.to_string()),
            list_limit: default_list_limit(),
            health_interval: Duration::from_secs(30),
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
        }
    }
}

impl NotebookConfig {
    /// Build the configuration from `NOTEBOOK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let demo_mode = get_env_bool("NOTEBOOK_DEMO_MODE", defaults.demo_mode);

        let api_base_url = get_env_or("NOTEBOOK_API_BASE_URL", DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        validate_base_url(&api_base_url)?;

        let default_folder = match env::var("NOTEBOOK_DEFAULT_FOLDER") {
            Ok(folder) if !folder.trim().is_empty() => Some(folder),
            Ok(_) => None,
            Err(_) if demo_mode => defaults.default_folder.clone(),
            Err(_) => None,
        };

        let list_limit = get_env_int("NOTEBOOK_LIST_LIMIT", defaults.list_limit);
        if list_limit == 0 {
            return Err(NotebookError::config(
                "NOTEBOOK_LIST_LIMIT must be greater than zero",
            ));
        }

        let config = Self {
            demo_mode,
            api_base_url,
            request_timeout: Duration::from_secs(get_env_int(
                "NOTEBOOK_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            connect_timeout: Duration::from_secs(get_env_int(
                "NOTEBOOK_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            knowledge_file: env::var("NOTEBOOK_KNOWLEDGE_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            default_folder,
            list_limit,
            health_interval: Duration::from_secs(get_env_int(
                "NOTEBOOK_HEALTH_INTERVAL_SECS",
                defaults.health_interval.as_secs(),
            )),
            server_host: get_env_or("NOTEBOOK_SERVER_HOST", &defaults.server_host),
            server_port: get_env_int("NOTEBOOK_SERVER_PORT", defaults.server_port),
        };

        if config.request_timeout.is_zero() {
            return Err(NotebookError::config(
                "NOTEBOOK_REQUEST_TIMEOUT_SECS must be greater than zero",
            ));
        }

        Ok(config)
    }
}
