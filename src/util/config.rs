//! Configuration file support.
//!
//! Settings come from two locations:
//! - Global: `~/.slipway/config.toml`, user-wide defaults
//! - Project: `.slipway/config.toml`, next to the manifest
//!
//! Project settings take precedence over global ones, and anything
//! given on the command line or through the environment beats both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{BuildType, LinkRequest};
use crate::errors::ConfigError;

/// Persistent defaults for configure runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Build defaults
    pub build: BuildDefaults,
}

/// The `[build]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildDefaults {
    /// Default build type (debug, fastdebug, release, ...)
    #[serde(rename = "build-type")]
    pub build_type: Option<String>,

    /// Default link request (auto, dynamic, static)
    pub link: Option<String>,

    /// Whether test targets are registered
    pub tests: Option<bool>,

    /// Toolchain prefix whose bin/ holds the compilers
    #[serde(rename = "toolchain-root")]
    pub toolchain_root: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load settings, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another settings layer into this one (other takes
    /// precedence).
    pub fn merge(&mut self, other: Settings) {
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.link.is_some() {
            self.build.link = other.build.link;
        }
        if other.build.tests.is_some() {
            self.build.tests = other.build.tests;
        }
        if other.build.toolchain_root.is_some() {
            self.build.toolchain_root = other.build.toolchain_root;
        }
    }

    /// The default build type, parsed. An unparseable value is a fatal
    /// input error, not something to ignore.
    pub fn build_type(&self) -> Result<Option<BuildType>, ConfigError> {
        self.build.build_type.as_deref().map(str::parse).transpose()
    }

    /// The default link request, parsed.
    pub fn link(&self) -> Result<Option<LinkRequest>, ConfigError> {
        self.build.link.as_deref().map(str::parse).transpose()
    }
}

/// Load merged settings from the global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.slipway/config.toml)
/// 2. Global config (~/.slipway/config.toml)
/// 3. Defaults
pub fn load_settings(global_path: Option<&Path>, project_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Some(global) = global_path {
        if global.exists() {
            settings.merge(Settings::load_or_default(global));
        }
    }

    if project_path.exists() {
        settings.merge(Settings::load_or_default(project_path));
    }

    settings
}

/// Global slipway config directory (~/.slipway).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".slipway"))
}

/// Global settings path (~/.slipway/config.toml).
pub fn global_settings_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Project settings path (.slipway/config.toml).
pub fn project_settings_path(project_root: &Path) -> PathBuf {
    project_root.join(".slipway").join("config.toml")
}
