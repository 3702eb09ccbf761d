//! Third-party library registration.
//!
//! Each declared dependency carries up to two prebuilt artifacts, one
//! static and one shared. Registration picks exactly one of them based
//! on the resolved link mode and which artifacts the declaration
//! provides. Availability means the declaration names a path; whether
//! the file exists on disk is the build executor's problem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::manifest::{home_override_var, ThirdPartySpec};
use crate::core::ResolvedLinkMode;
use crate::errors::ConfigError;

/// Which artifact the selection rule landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactChoice {
    Static,
    Shared,
}

impl std::fmt::Display for ArtifactChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactChoice::Static => write!(f, "static"),
            ArtifactChoice::Shared => write!(f, "shared"),
        }
    }
}

/// The selection rule, written out row by row.
///
/// Static linking takes the static artifact when there is one and falls
/// back to the shared artifact otherwise. Dynamic linking is the mirror
/// image. A declaration with no artifacts at all selects nothing.
pub fn select_artifact(
    mode: ResolvedLinkMode,
    has_static: bool,
    has_shared: bool,
) -> Option<ArtifactChoice> {
    match (mode, has_static, has_shared) {
        (ResolvedLinkMode::Static, true, _) => Some(ArtifactChoice::Static),
        (ResolvedLinkMode::Static, false, true) => Some(ArtifactChoice::Shared),
        (ResolvedLinkMode::Dynamic, _, true) => Some(ArtifactChoice::Shared),
        (ResolvedLinkMode::Dynamic, true, false) => Some(ArtifactChoice::Static),
        (_, false, false) => None,
    }
}

/// A registered third-party library with its chosen artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThirdPartyLibrary {
    pub name: String,
    pub choice: ArtifactChoice,
    pub artifact: PathBuf,
    pub deps: Vec<String>,
}

/// Registered libraries, keyed by name.
///
/// Re-registering a name replaces the earlier entry, so the registry
/// never holds two libraries with the same name. Iteration order is
/// the sorted name order, which keeps downstream output stable.
#[derive(Debug, Default)]
pub struct ThirdPartyRegistry {
    libraries: BTreeMap<String, ThirdPartyLibrary>,
}

impl ThirdPartyRegistry {
    pub fn new() -> Self {
        ThirdPartyRegistry {
            libraries: BTreeMap::new(),
        }
    }

    /// Register a library from already-resolved artifact paths.
    ///
    /// Fails with [`ConfigError::MissingArtifact`] when the declaration
    /// provides no artifact at all.
    pub fn register(
        &mut self,
        mode: ResolvedLinkMode,
        name: &str,
        static_artifact: Option<PathBuf>,
        shared_artifact: Option<PathBuf>,
        deps: &[String],
    ) -> Result<ThirdPartyLibrary, ConfigError> {
        let choice = select_artifact(mode, static_artifact.is_some(), shared_artifact.is_some())
            .ok_or_else(|| ConfigError::MissingArtifact {
                name: name.to_string(),
            })?;

        let artifact = match (choice, static_artifact, shared_artifact) {
            (ArtifactChoice::Static, Some(path), _) => path,
            (ArtifactChoice::Shared, _, Some(path)) => path,
            // select_artifact never picks an absent artifact
            _ => {
                return Err(ConfigError::MissingArtifact {
                    name: name.to_string(),
                })
            }
        };

        info!(
            "using {} artifact for `{}`: {}",
            choice,
            name,
            artifact.display()
        );

        let library = ThirdPartyLibrary {
            name: name.to_string(),
            choice,
            artifact,
            deps: deps.to_vec(),
        };

        if self
            .libraries
            .insert(name.to_string(), library.clone())
            .is_some()
        {
            debug!("replaced existing registration for `{}`", name);
        }

        Ok(library)
    }

    /// Register a library straight from its manifest declaration,
    /// applying the `<NAME>_HOME` environment override if one is set.
    /// Relative install roots resolve against `project_root`.
    pub fn register_spec(
        &mut self,
        mode: ResolvedLinkMode,
        name: &str,
        spec: &ThirdPartySpec,
        project_root: &Path,
    ) -> Result<ThirdPartyLibrary, ConfigError> {
        let home = effective_home(name, spec).map(|root| {
            if root.is_absolute() {
                root
            } else {
                project_root.join(root)
            }
        });
        let static_artifact = spec
            .static_artifact
            .as_deref()
            .map(|path| rebase(home.as_deref(), path));
        let shared_artifact = spec
            .shared_artifact
            .as_deref()
            .map(|path| rebase(home.as_deref(), path));
        self.register(mode, name, static_artifact, shared_artifact, &spec.deps)
    }

    pub fn get(&self, name: &str) -> Option<&ThirdPartyLibrary> {
        self.libraries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Registered libraries in sorted name order.
    pub fn libraries(&self) -> impl Iterator<Item = &ThirdPartyLibrary> {
        self.libraries.values()
    }
}

/// The install root for a declaration: the `<NAME>_HOME` environment
/// variable when set, otherwise the manifest's `home` field.
fn effective_home(name: &str, spec: &ThirdPartySpec) -> Option<PathBuf> {
    match std::env::var_os(home_override_var(name)) {
        Some(root) => {
            debug!(
                "{} overrides install root for `{}`",
                home_override_var(name),
                name
            );
            Some(PathBuf::from(root))
        }
        None => spec.home.clone(),
    }
}

/// Join a relative artifact path onto the install root. Absolute
/// artifact paths and rootless declarations pass through unchanged.
fn rebase(home: Option<&Path>, artifact: &Path) -> PathBuf {
    if artifact.is_absolute() {
        return artifact.to_path_buf();
    }
    match home {
        Some(root) => root.join(artifact),
        None => artifact.to_path_buf(),
    }
}
