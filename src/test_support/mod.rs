//! Test utilities and fakes for Slipway unit tests.
//!
//! Platform probing and manifest loading are the two inputs that are
//! awkward to control in tests; this module provides a deterministic
//! probe and an on-disk sample project for them.
//!
//! # Example
//!
//! ```rust,ignore
//! use slipway::test_support::{project_fixture, FakeProbe};
//!
//! let probe = FakeProbe::gnu().with_linker(LinkerFamily::Gold);
//! let (dir, manifest) = project_fixture();
//! ```

use std::path::{Path, PathBuf};

use crate::core::manifest::Manifest;
use crate::probe::{CompilerFamily, LinkerFamily, PlatformProbe};

/// Deterministic platform probe for tests.
#[derive(Debug, Clone)]
pub struct FakeProbe {
    family: CompilerFamily,
    linker: LinkerFamily,
    interactive: bool,
    term: Option<String>,
    cc: PathBuf,
    cxx: PathBuf,
}

impl FakeProbe {
    /// A gnu toolchain on a non-gold linker with no terminal attached.
    pub fn gnu() -> Self {
        FakeProbe {
            family: CompilerFamily::Gnu,
            linker: LinkerFamily::Other,
            interactive: false,
            term: None,
            cc: PathBuf::from("/usr/bin/gcc"),
            cxx: PathBuf::from("/usr/bin/g++"),
        }
    }

    /// A clang toolchain, otherwise like [`FakeProbe::gnu`].
    pub fn clang() -> Self {
        FakeProbe {
            family: CompilerFamily::Clang,
            cc: PathBuf::from("/usr/bin/clang"),
            cxx: PathBuf::from("/usr/bin/clang++"),
            ..FakeProbe::gnu()
        }
    }

    pub fn with_linker(mut self, linker: LinkerFamily) -> Self {
        self.linker = linker;
        self
    }

    /// Attach an interactive terminal of the given type.
    pub fn with_terminal(mut self, term: &str) -> Self {
        self.interactive = true;
        self.term = Some(term.to_string());
        self
    }
}

impl PlatformProbe for FakeProbe {
    fn compiler_family(&self) -> CompilerFamily {
        self.family
    }

    fn linker_family(&self) -> LinkerFamily {
        self.linker
    }

    fn is_interactive_stderr(&self) -> bool {
        self.interactive
    }

    fn term(&self) -> Option<String> {
        self.term.clone()
    }

    fn cc(&self) -> &Path {
        &self.cc
    }

    fn cxx(&self) -> &Path {
        &self.cxx
    }
}

/// Manifest content for the sample project used across tests.
pub const SAMPLE_MANIFEST: &str = r#"
[project]
name = "quill"
test-link = ["quill", "quill_test_util", "gutil"]

[thirdparty.gtest]
home = "thirdparty/installed"
static = "lib/libgtest.a"
shared = "lib/libgtest.so"
deps = ["pthread"]

[thirdparty.ev]
home = "thirdparty/installed"
static = "lib/libev.a"

[thirdparty.glog]
home = "thirdparty/installed"
shared = "lib/libglog.so"
deps = ["gflags"]

[[tests]]
path = "util/bitmap-test"

[tests.properties]
timeout = "60"

[[tests]]
path = "scripts/version_check"

[[tools]]
name = "ctags"
command = ["ctags", "-R", "--languages=c++"]
"#;

/// Write the sample project to a temp directory and load its manifest.
///
/// The project declares one compiled test (a matching `.cc` source
/// exists under the source root) and one script test (no source), three
/// third-party libraries covering the artifact decision table, and a
/// tool registration. The returned directory guard keeps the files
/// alive for the duration of the test.
pub fn project_fixture() -> (tempfile::TempDir, Manifest) {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    std::fs::write(root.join("Slipway.toml"), SAMPLE_MANIFEST).unwrap();

    std::fs::create_dir_all(root.join("src/util")).unwrap();
    std::fs::write(root.join("src/util/bitmap-test.cc"), "// sample test\n").unwrap();

    std::fs::create_dir_all(root.join("build-support")).unwrap();
    std::fs::write(root.join("build-support/run-test.sh"), "#!/bin/sh\n").unwrap();

    let manifest = Manifest::load(&root.join("Slipway.toml")).unwrap();
    (dir, manifest)
}
