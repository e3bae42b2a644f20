//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targeted_creator: CreatorConfig,

    #[serde(default)]
    pub my_account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Creator targeting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorConfig {
    /// Creator vanity name or page URL.
    #[serde(default)]
    pub creator_id: Option<String>,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Full `Cookie` header copied from a logged-in browser session.
    #[serde(default)]
    pub cookie: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Crawl options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Grouping strategy ("none" or "by-post").
    #[serde(default = "default_grouping")]
    pub grouping: String,

    /// Whether to download media of posts the session cannot view.
    #[serde(default)]
    pub download_inaccessible_media: bool,

    /// Maximum number of media files to schedule, 0 for unlimited.
    #[serde(default)]
    pub download_limit: usize,

    /// Number of parallel downloads.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Downloaded/crawled fraction below which the run is flagged.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    /// Stop scheduling downloads after the first failed media item.
    #[serde(default)]
    pub abort_on_error: bool,

    /// HTTP request timeout in seconds, 0 to disable.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            grouping: default_grouping(),
            download_inaccessible_media: false,
            download_limit: 0,
            concurrency: default_concurrency(),
            warning_threshold: default_warning_threshold(),
            abort_on_error: false,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_grouping() -> String {
    "none".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_warning_threshold() -> f64 {
    0.8
}

fn default_request_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    ///
    /// Falls back to a folder in the user's download directory, then to the
    /// current directory.
    pub fn download_directory(&self) -> PathBuf {
        if let Some(dir) = &self.options.download_directory {
            return dir.clone();
        }

        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.join("patreon-crawler")))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the HTTP request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.options.request_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Get the download limit, if any.
    pub fn download_limit(&self) -> Option<usize> {
        match self.options.download_limit {
            0 => None,
            limit => Some(limit),
        }
    }
}
