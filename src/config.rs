//! Layered configuration for ticket-desk
//!
//! Values are resolved in this order, later sources overriding earlier ones:
//! built-in defaults, an optional config file (`ticket-desk.toml` in the
//! platform config directory, or an explicit path), and `TICKET_DESK__*`
//! environment variables (`TICKET_DESK__API__BASE_URL`, ...).

use crate::error::Result;
use crate::i18n::Locale;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "TICKET_DESK";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub editor: EditorConfig,
    pub messages: MessagesConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
    pub captcha: CaptchaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server origin, without the `/api/v1` prefix
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before an edit burst becomes a history entry
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { debounce_ms: 3_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub poll_interval_ms: u64,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File backing the client key-value store; defaults to the platform data dir
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub locale: Locale,
    pub page_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            page_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
    /// Submissions faster than this are treated as automated
    pub min_fill_ms: u64,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self { min_fill_ms: 1_500 }
    }
}

impl Config {
    /// Load configuration from the default file location and the environment
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load configuration from an explicit file (if present) and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            tracing::debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Default config file path (`<config dir>/ticket-desk.toml`)
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("ticket-desk.toml"))
    }

    /// Resolved path of the key-value storage file
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || PathBuf::from(".ticket-desk").join("storage.json"),
                |dirs| dirs.data_dir().join("storage.json"),
            )
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "ticket-desk")
}
