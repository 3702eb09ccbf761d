//! Slipway.toml manifest parsing and schema.
//!
//! The manifest declares the project being configured: where its
//! sources live, which third-party libraries it consumes, which test
//! and tooling targets exist. It carries no resolution logic; every
//! decision about the declared data happens later in the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Slipway.toml";

/// Project metadata from the [project] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name, also the name of the library under test.
    pub name: String,

    /// Root directory for compiled test sources, relative to the
    /// manifest directory.
    #[serde(default = "default_source_root", rename = "source-root")]
    pub source_root: PathBuf,

    /// Wrapper script that executes every test target.
    #[serde(default = "default_test_runner", rename = "test-runner")]
    pub test_runner: PathBuf,

    /// Fixed link set for compiled test binaries: the library under
    /// test, its test-support libraries, and base dependencies.
    #[serde(default, rename = "test-link")]
    pub test_link: Vec<String>,
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_test_runner() -> PathBuf {
    PathBuf::from("build-support/run-test.sh")
}

/// A third-party library declaration from [thirdparty.NAME].
///
/// Artifact paths are relative to `home` unless absolute. Which of the
/// two artifacts actually gets linked is decided later, once the link
/// mode is resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThirdPartySpec {
    /// Installation prefix. Overridable per dependency through the
    /// `<NAME>_HOME` environment variable.
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Static archive path, if one is installed.
    #[serde(default, rename = "static")]
    pub static_artifact: Option<PathBuf>,

    /// Shared object path, if one is installed.
    #[serde(default, rename = "shared")]
    pub shared_artifact: Option<PathBuf>,

    /// Names of transitive link dependencies.
    #[serde(default)]
    pub deps: Vec<String>,
}

/// A test declaration from a [[tests]] entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Relative test path; the last component is the target identity.
    pub path: String,

    /// Property key/value pairs attached verbatim to the target.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A tooling declaration from a [[tools]] entry.
///
/// Tools are unconditional pass-through registrations (tag generation,
/// lint, cross-reference databases).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub command: Vec<String>,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    project: Option<ProjectMetadata>,

    #[serde(default)]
    thirdparty: BTreeMap<String, ThirdPartySpec>,

    #[serde(default)]
    tests: Vec<TestSpec>,

    #[serde(default)]
    tools: Vec<ToolSpec>,
}

/// The parsed Slipway.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// Declared third-party libraries, keyed by name. Sorted keys keep
    /// every downstream iteration deterministic.
    pub thirdparty: BTreeMap<String, ThirdPartySpec>,

    /// Declared test targets
    pub tests: Vec<TestSpec>,

    /// Declared tooling targets
    pub tools: Vec<ToolSpec>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(content).with_context(|| "failed to parse Slipway.toml")?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let Some(project) = raw.project else {
            anyhow::bail!(
                "manifest at {} is missing the [project] section",
                path.display()
            );
        };

        if project.name.is_empty() {
            anyhow::bail!("manifest at {} has an empty project name", path.display());
        }

        for test in &raw.tests {
            if test.path.is_empty() {
                anyhow::bail!("manifest at {} declares a test with an empty path", path.display());
            }
        }

        for tool in &raw.tools {
            if tool.command.is_empty() {
                anyhow::bail!(
                    "manifest at {} declares tool `{}` with an empty command",
                    path.display(),
                    tool.name
                );
            }
        }

        Ok(Manifest {
            project,
            thirdparty: raw.thirdparty,
            tests: raw.tests,
            tools: raw.tools,
            manifest_dir,
        })
    }

    /// Absolute source root for compiled test sources.
    pub fn source_root(&self) -> PathBuf {
        self.manifest_dir.join(&self.project.source_root)
    }

    /// Absolute path to the test-runner wrapper script.
    pub fn test_runner(&self) -> PathBuf {
        self.manifest_dir.join(&self.project.test_runner)
    }
}

/// Find `Slipway.toml` starting from `start` and searching upward.
pub fn find_manifest(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            anyhow::bail!(
                "could not find {} in `{}` or any parent directory",
                MANIFEST_NAME,
                start.display()
            );
        }
    }
}

/// Environment variable that overrides a dependency's home prefix.
///
/// The name is uppercased with every non-alphanumeric byte mapped to an
/// underscore, so `gtest` reads `GTEST_HOME` and `libev` reads
/// `LIBEV_HOME`.
pub fn home_override_var(name: &str) -> String {
    let mut var: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    var.push_str("_HOME");
    var
}
