//! Real-host platform probe.
//!
//! Compiler discovery follows the usual priority order: an explicit
//! toolchain root wins, then the `CC`/`CXX` environment variables, then
//! a PATH search. Family detection first matches on the executable name
//! and only shells out for a `--version` query when the name is
//! inconclusive.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};
use which::which;

use crate::errors::ConfigError;
use crate::util::process::ProcessBuilder;

use super::{CompilerFamily, LinkerFamily, PlatformProbe};

/// Probe backed by the actual host toolchain and terminal.
#[derive(Debug, Clone)]
pub struct HostProbe {
    cc: PathBuf,
    cxx: PathBuf,
    compiler_family: CompilerFamily,
    linker_family: LinkerFamily,
}

impl HostProbe {
    /// Detect the host toolchain, optionally rooted at an explicit
    /// installation prefix.
    pub fn detect(toolchain_root: Option<&Path>) -> Result<HostProbe> {
        let (cc, cxx) = find_compilers(toolchain_root)?;
        let compiler_family = detect_compiler_family(&cxx);
        let linker_family = detect_linker_family(&cxx);

        info!(
            "detected toolchain: cxx={} family={} linker={}",
            cxx.display(),
            compiler_family,
            linker_family
        );

        Ok(HostProbe {
            cc,
            cxx,
            compiler_family,
            linker_family,
        })
    }
}

impl PlatformProbe for HostProbe {
    fn compiler_family(&self) -> CompilerFamily {
        self.compiler_family
    }

    fn linker_family(&self) -> LinkerFamily {
        self.linker_family
    }

    fn is_interactive_stderr(&self) -> bool {
        std::io::stderr().is_terminal()
    }

    fn term(&self) -> Option<String> {
        std::env::var("TERM").ok()
    }

    fn cc(&self) -> &Path {
        &self.cc
    }

    fn cxx(&self) -> &Path {
        &self.cxx
    }
}

/// Locate the C and C++ compiler executables.
fn find_compilers(toolchain_root: Option<&Path>) -> Result<(PathBuf, PathBuf)> {
    // An explicit root is an override, not a hint: nothing usable under
    // it is a fatal error rather than a fallthrough to PATH.
    if let Some(root) = toolchain_root {
        let bin = root.join("bin");
        for (cc_name, cxx_name) in [("gcc", "g++"), ("clang", "clang++")] {
            let cc = bin.join(cc_name);
            let cxx = bin.join(cxx_name);
            if cxx.is_file() {
                return Ok((cc, cxx));
            }
        }
        return Err(ConfigError::CompilerNotFound {
            searched: vec![
                bin.join("g++").display().to_string(),
                bin.join("clang++").display().to_string(),
            ],
        }
        .into());
    }

    if let Ok(cxx_env) = std::env::var("CXX") {
        let cxx = PathBuf::from(cxx_env);
        let cc = match std::env::var("CC") {
            Ok(cc_env) => PathBuf::from(cc_env),
            Err(_) => infer_cc(&cxx),
        };
        return Ok((cc, cxx));
    }

    let cxx = match which("c++")
        .or_else(|_| which("g++"))
        .or_else(|_| which("clang++"))
    {
        Ok(p) => p,
        Err(_) => {
            return Err(ConfigError::CompilerNotFound {
                searched: vec!["c++".to_string(), "g++".to_string(), "clang++".to_string()],
            }
            .into());
        }
    };

    let cc = if let Ok(cc_env) = std::env::var("CC") {
        PathBuf::from(cc_env)
    } else {
        which("cc")
            .or_else(|_| which("gcc"))
            .or_else(|_| which("clang"))
            .unwrap_or_else(|_| infer_cc(&cxx))
    };

    Ok((cc, cxx))
}

/// Infer the C compiler path from a C++ compiler path.
fn infer_cc(cxx: &Path) -> PathBuf {
    let cxx_str = cxx.to_string_lossy();

    // g++ or *-g++ -> gcc or *-gcc
    if let Some(prefix) = cxx_str.strip_suffix("g++") {
        return PathBuf::from(format!("{}gcc", prefix));
    }

    // clang++ -> clang
    if let Some(prefix) = cxx_str.strip_suffix("clang++") {
        return PathBuf::from(format!("{}clang", prefix));
    }

    // c++ or */c++ -> cc
    if let Some(prefix) = cxx_str.strip_suffix("c++") {
        return PathBuf::from(format!("{}cc", prefix));
    }

    cxx.to_path_buf()
}

/// Detect whether the compiler is a gcc or a clang frontend.
fn detect_compiler_family(cxx: &Path) -> CompilerFamily {
    let name = cxx
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if let Some(family) = family_from_name(&name) {
        return family;
    }

    // Ambiguous name (c++, cxx wrappers); ask the binary itself.
    let output = ProcessBuilder::new(cxx)
        .arg("--version")
        .env("LC_ALL", "C")
        .exec();

    if let Ok(output) = output {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if let Some(family) = family_from_version(&stdout) {
            return family;
        }
    }

    debug!(
        "could not classify compiler `{}`, assuming gnu",
        cxx.display()
    );
    CompilerFamily::Gnu
}

/// Classify a compiler by its executable name, when unambiguous.
fn family_from_name(name: &str) -> Option<CompilerFamily> {
    if name.contains("clang") {
        Some(CompilerFamily::Clang)
    } else if name.contains("g++") || name.contains("gcc") {
        Some(CompilerFamily::Gnu)
    } else {
        None
    }
}

/// Classify a compiler by its `--version` output.
fn family_from_version(output: &str) -> Option<CompilerFamily> {
    if output.contains("clang") {
        Some(CompilerFamily::Clang)
    } else if output.contains("gcc") || output.contains("free software foundation") {
        Some(CompilerFamily::Gnu)
    } else {
        None
    }
}

/// Detect the linker family by querying the linker's version output.
fn detect_linker_family(cxx: &Path) -> LinkerFamily {
    if is_apple_host() {
        // Apple's ld rejects --version; the gold constraint cannot
        // apply there anyway.
        debug!("apple host, skipping linker probe");
        return LinkerFamily::Other;
    }

    let output = ProcessBuilder::new(cxx)
        .arg("-Wl,--version")
        .env("LC_ALL", "C")
        .exec();

    match output {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            linker_from_version(&text)
        }
        Err(e) => {
            debug!("linker probe failed ({}), assuming non-gold", e);
            LinkerFamily::Other
        }
    }
}

/// Whether the host platform is Apple-like.
fn is_apple_host() -> bool {
    cfg!(target_os = "macos")
}

/// Classify a linker by its version output.
fn linker_from_version(output: &str) -> LinkerFamily {
    if output.to_lowercase().contains("gold") {
        LinkerFamily::Gold
    } else {
        LinkerFamily::Other
    }
}
