//! TOML-based configuration for randr-desk.
//!
//! Read from the platform-appropriate config file:
//! - Linux:  `$XDG_CONFIG_HOME/randr-desk/config.toml` (or `~/.config/randr-desk/config.toml`)
//! - macOS:  `~/Library/Application Support/RandrDesk/config.toml`
//!
//! The file is optional; a missing file means all defaults.  randr-desk only
//! reads it.
//!
//! # Example
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [backend]
//! tool = "/usr/bin/xrandr"
//!
//! [snap]
//! sensitivity = 40
//! fallback_anchors = [[20, 20], [200, 20], [400, 20], [20, 150], [200, 150]]
//!
//! [timing]
//! refresh_after_action_ms = 1000
//! refresh_after_batch_ms = 500
//!
//! [defaults]
//! mode = "1920x1080"
//! rate = "60.00"
//! ```
//!
//! # Serde default values
//!
//! Every section and every field has a default (`#[serde(default)]` on the
//! sections, `#[serde(default = "some_fn")]` on the fields), so a file may
//! contain only the settings it wants to change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use randr_core::domain::snap::{DEFAULT_FALLBACK_ANCHORS, DEFAULT_SENSITIVITY};
use randr_core::SnapEngine;
use serde::Deserialize;
use thiserror::Error;

use crate::application::session::SessionSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Program name or path of the display tool.
    #[serde(default = "default_tool")]
    pub tool: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SnapConfig {
    /// Canvas units; a candidate snaps when closer than three times this.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: u32,
    /// Anchor points tried in order when a snap would overlap another tile.
    #[serde(default = "default_fallback_anchors")]
    pub fallback_anchors: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Milliseconds to wait before re-reading the layout after mirror / extend.
    #[serde(default = "default_refresh_after_action_ms")]
    pub refresh_after_action_ms: u64,
    /// Milliseconds to wait before re-reading the layout after apply / unlink.
    #[serde(default = "default_refresh_after_batch_ms")]
    pub refresh_after_batch_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Resolution preselected for mirror / extend when offered.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Refresh rate preselected for mirror / extend.
    #[serde(default = "default_rate")]
    pub rate: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_tool() -> String {
    "xrandr".to_string()
}
fn default_sensitivity() -> u32 {
    DEFAULT_SENSITIVITY
}
fn default_fallback_anchors() -> Vec<(i32, i32)> {
    DEFAULT_FALLBACK_ANCHORS.to_vec()
}
fn default_refresh_after_action_ms() -> u64 {
    1000
}
fn default_refresh_after_batch_ms() -> u64 {
    500
}
fn default_mode() -> String {
    randr_core::domain::modes::DEFAULT_MODE.to_string()
}
fn default_rate() -> String {
    randr_core::domain::modes::DEFAULT_RATE.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
        }
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            fallback_anchors: default_fallback_anchors(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_after_action_ms: default_refresh_after_action_ms(),
            refresh_after_batch_ms: default_refresh_after_batch_ms(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            rate: default_rate(),
        }
    }
}

impl AppConfig {
    /// The snap engine described by `[snap]`.
    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine::new(self.snap.sensitivity, self.snap.fallback_anchors.clone())
    }

    /// Session tunables described by `[timing]` and `[defaults]`.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            refresh_after_action: Duration::from_millis(self.timing.refresh_after_action_ms),
            refresh_after_batch: Duration::from_millis(self.timing.refresh_after_batch_ms),
            default_mode: self.defaults.mode.clone(),
            default_rate: self.defaults.rate.clone(),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the platform config directory including the `randr-desk` component.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RandrDesk")
        })
    }

    #[cfg(not(target_os = "macos"))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("randr-desk"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
