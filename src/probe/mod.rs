//! Platform probing.
//!
//! Everything the resolver needs to know about the host (compiler
//! family, linker family, terminal state) sits behind [`PlatformProbe`]
//! so the decision logic can be driven by deterministic fakes in tests
//! while production code probes the real toolchain.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod host;

pub use host::HostProbe;

/// Detected compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    /// gcc and gcc-compatible frontends.
    Gnu,
    /// clang, including Apple clang.
    Clang,
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerFamily::Gnu => write!(f, "gnu"),
            CompilerFamily::Clang => write!(f, "clang"),
        }
    }
}

/// Detected linker family.
///
/// Only gold is singled out; its symbol resolution misbehaves in one
/// specific link-mode combination (see the link-mode resolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkerFamily {
    Gold,
    Other,
}

impl fmt::Display for LinkerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkerFamily::Gold => write!(f, "gold"),
            LinkerFamily::Other => write!(f, "other"),
        }
    }
}

/// Read-only view of the host platform, injected into resolution.
pub trait PlatformProbe {
    /// Family of the detected C++ compiler.
    fn compiler_family(&self) -> CompilerFamily;

    /// Family of the linker behind the detected compiler.
    fn linker_family(&self) -> LinkerFamily;

    /// Whether standard error is attached to an interactive terminal.
    fn is_interactive_stderr(&self) -> bool;

    /// The `TERM` value, if any.
    fn term(&self) -> Option<String>;

    /// Path to the C compiler.
    fn cc(&self) -> &Path;

    /// Path to the C++ compiler.
    fn cxx(&self) -> &Path;

    /// Whether color diagnostics make sense on this terminal: stderr is
    /// interactive and the terminal type is set to something other than
    /// `dumb`.
    fn supports_color(&self) -> bool {
        match self.term() {
            Some(term) => self.is_interactive_stderr() && term != "dumb",
            None => false,
        }
    }
}
