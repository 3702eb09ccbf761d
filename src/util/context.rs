//! Global context for slipway operations.
//!
//! Holds the invocation state every command needs: where the run
//! started, output preferences, and access to the manifest and layered
//! settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{self, Manifest};
use crate::util::config::{self, Settings};

#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            verbose: false,
            color: true,
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Slipway.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf> {
        manifest::find_manifest(&self.cwd)
    }

    /// Load the manifest governing the working directory.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = self.find_manifest()?;
        Manifest::load(&path)
    }

    /// Load layered settings for a project root: the user-wide file
    /// under the home directory, then the project's own overrides.
    pub fn load_settings(&self, project_root: &Path) -> Settings {
        let global = config::global_settings_path();
        config::load_settings(
            global.as_deref(),
            &config::project_settings_path(project_root),
        )
    }
}
