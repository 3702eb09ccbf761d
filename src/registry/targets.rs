//! Test and tool target registration.
//!
//! Tests are declared by path relative to the source root. A declared
//! test whose `.cc` source exists is a compiled test binary; anything
//! else is a script shipped in the source tree. Both kinds run through
//! the project's test-runner wrapper with a single path argument.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::core::Manifest;
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Compiled,
    Script,
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestKind::Compiled => write!(f, "compiled"),
            TestKind::Script => write!(f, "script"),
        }
    }
}

/// A registered test.
///
/// `path` is what the runner receives as its argument: the executable
/// location for compiled tests, the script's source-tree location
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTarget {
    pub identity: String,
    pub kind: TestKind,
    pub path: PathBuf,
    pub link_libs: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolTarget {
    pub name: String,
    pub command: Vec<String>,
}

/// Registry for test and tool targets.
///
/// The tests-enabled gate is fixed at construction. When it is off,
/// test registration is a silent no-op while tool registration keeps
/// working, so a tests-off configuration still carries its tools.
#[derive(Debug)]
pub struct TargetRegistry {
    tests_enabled: bool,
    source_root: PathBuf,
    test_runner: PathBuf,
    test_link: Vec<String>,
    bin_dir: PathBuf,
    tests: Vec<TestTarget>,
    seen: BTreeMap<String, String>,
    tools: Vec<ToolTarget>,
}

impl TargetRegistry {
    /// `bin_dir` is where compiled test executables will land, usually
    /// `<output dir>/bin`.
    pub fn new(manifest: &Manifest, tests_enabled: bool, bin_dir: PathBuf) -> Self {
        TargetRegistry {
            tests_enabled,
            source_root: manifest.source_root(),
            test_runner: manifest.test_runner(),
            test_link: manifest.project.test_link.clone(),
            bin_dir,
            tests: Vec::new(),
            seen: BTreeMap::new(),
            tools: Vec::new(),
        }
    }

    /// Register a test declared at `relative_name` under the source
    /// root. Returns `Ok(None)` without recording anything when tests
    /// are disabled.
    pub fn register_test(
        &mut self,
        relative_name: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<Option<&TestTarget>, ConfigError> {
        if !self.tests_enabled {
            debug!("tests disabled, skipping `{}`", relative_name);
            return Ok(None);
        }

        let identity = identity_of(relative_name);
        if let Some(first) = self.seen.get(&identity) {
            return Err(ConfigError::DuplicateTestTarget {
                identity,
                first: first.clone(),
                second: relative_name.to_string(),
            });
        }

        let source = self.source_root.join(format!("{relative_name}.cc"));
        let target = if source.is_file() {
            TestTarget {
                identity: identity.clone(),
                kind: TestKind::Compiled,
                path: self.bin_dir.join(&identity),
                link_libs: self.test_link.clone(),
                properties: properties.clone(),
            }
        } else {
            TestTarget {
                identity: identity.clone(),
                kind: TestKind::Script,
                path: self.source_root.join(relative_name),
                link_libs: Vec::new(),
                properties: properties.clone(),
            }
        };

        debug!("registered {} test `{}`", target.kind, target.identity);
        self.seen.insert(identity, relative_name.to_string());
        self.tests.push(target);
        Ok(self.tests.last())
    }

    /// Tools are registered unconditionally.
    pub fn register_tool(&mut self, name: &str, command: &[String]) {
        debug!("registered tool `{}`", name);
        self.tools.push(ToolTarget {
            name: name.to_string(),
            command: command.to_vec(),
        });
    }

    pub fn tests_enabled(&self) -> bool {
        self.tests_enabled
    }

    /// Tests in declaration order.
    pub fn tests(&self) -> &[TestTarget] {
        &self.tests
    }

    pub fn tools(&self) -> &[ToolTarget] {
        &self.tools
    }

    /// The wrapper every test runs through.
    pub fn runner(&self) -> &Path {
        &self.test_runner
    }
}

/// A test's identity is the last component of its declared path, so
/// `util/bitmap-test` and `client/bitmap-test` collide.
fn identity_of(relative_name: &str) -> String {
    Path::new(relative_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(relative_name)
        .to_string()
}
