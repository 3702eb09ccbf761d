//! Slipway - A build configuration resolver for native C++ projects
//!
//! This crate provides the core library functionality for Slipway:
//! resolving compiler flag sets, choosing a linking mode, registering
//! third-party dependencies, and registering test/tooling targets. The
//! result is a build plan consumed by an external compiler/linker
//! toolchain; Slipway itself never compiles anything.

pub mod core;
pub mod errors;
pub mod ops;
pub mod plan;
pub mod probe;
pub mod registry;
pub mod resolve;
pub mod util;

/// Test utilities and fakes for Slipway unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a deterministic platform probe and
/// manifest fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    build_type::BuildType,
    link::{LinkReason, LinkRequest, ResolvedLinkMode},
    manifest::Manifest,
    sanitizer::{Sanitizer, SanitizerSet},
};

pub use crate::errors::ConfigError;
pub use crate::plan::BuildPlan;
pub use crate::probe::{CompilerFamily, LinkerFamily, PlatformProbe};
pub use crate::resolve::configuration::BuildConfiguration;
pub use crate::util::context::GlobalContext;
