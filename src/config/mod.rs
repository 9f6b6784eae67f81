//! Configuration management for Mentor

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the configured backend
pub const API_URL_ENV: &str = "MENTOR_API_URL";

/// Title shown in the header while the table of contents is displayed
pub const DEFAULT_COURSE_TITLE: &str = "Hylee's Intro to Multifamily";

/// Reveal pacing in milliseconds per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSpeeds {
    /// Course content and prompts
    pub content_ms: u64,
    /// Other bot text
    pub message_ms: u64,
}

impl Default for RevealSpeeds {
    fn default() -> Self {
        Self { content_ms: 20, message_ms: 50 }
    }
}

impl RevealSpeeds {
    pub fn content(&self) -> Duration {
        Duration::from_millis(self.content_ms)
    }

    pub fn message(&self) -> Duration {
        Duration::from_millis(self.message_ms)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Course backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Course title for the table of contents header
    pub course_title: String,

    /// Reveal pacing
    pub reveal: RevealSpeeds,

    /// Connection timeout for backend requests
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            course_title: DEFAULT_COURSE_TITLE.to_string(),
            reveal: RevealSpeeds::default(),
            connect_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mentor").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mentor").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Default log file location
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("mentor.log"))
    }

    /// Resolve the backend URL
    ///
    /// Precedence: command line, then `MENTOR_API_URL`, then the config file,
    /// then the local development server.
    pub fn resolve_api_url(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env, self.api_base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
