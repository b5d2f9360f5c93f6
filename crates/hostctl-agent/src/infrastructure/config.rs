//! TOML configuration for the agent.
//!
//! Read from `$HOSTCTL_CONFIG` when set, otherwise from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\hostctl\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/hostctl/config.toml` or `~/.config/hostctl/config.toml`
//! - macOS:    `~/Library/Application Support/hostctl/config.toml`
//!
//! ```toml
//! [agent]
//! log_level = "debug"
//! backend = "native"      # or "unsupported", "mock"
//!
//! [window]
//! kind = "x11"            # or "win32", "quartz"
//! handle = 0x3a00007
//! ```
//!
//! Every field has a serde default, so a missing file, a missing table or a
//! missing key all fall back to defaults.  Without a `[window]` table there
//! is no window to confine to and grabbing fails.

use std::path::{Path, PathBuf};

use hostctl_core::NativeWindow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::backend::BackendKind;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "HOSTCTL_CONFIG";

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

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent: AgentSection,
    /// Window that pointer confinement is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<NativeWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub backend: BackendKind,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            backend: BackendKind::default(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the config file path: `$HOSTCTL_CONFIG`, else the platform
/// config directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if neither is available.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from [`config_file_path`].
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AgentConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config at `path`, returning defaults if the file does not
/// exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AgentConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Platform config directory including the `hostctl` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("hostctl"))
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hostctl"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("hostctl"))
    }

    #[cfg(not(any(
        target_os = "windows",
        target_os = "linux",
        target_os = "freebsd",
        target_os = "macos"
    )))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
