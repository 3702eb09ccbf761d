//! Configuration error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::build_type::BuildType;
use crate::core::link::LinkRequest;
use crate::util::diagnostic::Diagnostic;

/// Fatal error during configuration resolution.
///
/// Any of these aborts the whole configuration pass; no partial plan is
/// produced. The variants carry the exact input combination that
/// triggered them so the failure is reproducible from the message alone.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("unknown build type `{value}`, must be debug|fastdebug|release|profile_gen|profile_build")]
    #[diagnostic(code(slipway::config::unknown_build_type))]
    UnknownBuildType { value: String },

    #[error("invalid link mode `{value}`, must be auto|dynamic|static")]
    #[diagnostic(code(slipway::config::invalid_link_mode))]
    InvalidLinkMode { value: String },

    #[error("unknown sanitizer `{value}`, must be address|thread")]
    #[diagnostic(code(slipway::config::unknown_sanitizer))]
    UnknownSanitizer { value: String },

    #[error("address and thread sanitizers cannot be combined")]
    #[diagnostic(
        code(slipway::config::sanitizer_conflict),
        help("Configure two separate runs, one per sanitizer")
    )]
    SanitizerConflict,

    #[error("code coverage does not link correctly under clang")]
    #[diagnostic(
        code(slipway::link::coverage_clang),
        help("Build with a gcc toolchain when coverage is enabled")
    )]
    CoverageWithClang { compiler: String },

    #[error("code coverage requires static linking")]
    #[diagnostic(
        code(slipway::link::coverage_dynamic),
        help("Drop the explicit dynamic link request or disable coverage")
    )]
    CoverageNeedsStatic {
        requested: LinkRequest,
        build_type: BuildType,
    },

    #[error("dynamic linking with the gold linker is unsupported in release builds")]
    #[diagnostic(
        code(slipway::link::gold_dynamic_release),
        help("Link statically or switch to a non-gold linker")
    )]
    GoldDynamicRelease {
        requested: LinkRequest,
        build_type: BuildType,
    },

    #[error("no static or shared artifact available for `{name}`")]
    #[diagnostic(code(slipway::thirdparty::missing_artifact))]
    MissingArtifact { name: String },

    #[error("duplicate test target `{identity}`")]
    #[diagnostic(
        code(slipway::targets::duplicate_test),
        help("Rename one of the test sources so the file names differ")
    )]
    DuplicateTestTarget {
        identity: String,
        first: String,
        second: String,
    },

    #[error("third-party dependency cycle involving `{name}`")]
    #[diagnostic(
        code(slipway::thirdparty::dependency_cycle),
        help("Break the cycle in the [thirdparty] deps lists")
    )]
    DependencyCycle { name: String },

    #[error("no c++ compiler found")]
    #[diagnostic(
        code(slipway::probe::compiler_not_found),
        help("Install gcc or clang, or point --toolchain-root at a prefix containing bin/g++")
    )]
    CompilerNotFound { searched: Vec<String> },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::UnknownBuildType { value } => {
                Diagnostic::error(format!("unknown build type `{}`", value))
                    .with_context(
                        "valid build types: debug, fastdebug, release, profile_gen, profile_build",
                    )
                    .with_suggestion("Pass one of the valid build types with `--build-type`")
            }

            ConfigError::InvalidLinkMode { value } => {
                Diagnostic::error(format!("invalid link mode `{}`", value))
                    .with_context("link mode must be auto|dynamic|static")
                    .with_suggestion("Use `--link auto` to let the build type pick a mode")
            }

            ConfigError::UnknownSanitizer { value } => {
                Diagnostic::error(format!("unknown sanitizer `{}`", value))
                    .with_context("valid sanitizers: address, thread")
                    .with_suggestion("Pass a comma-separated subset with `--sanitize`")
            }

            ConfigError::SanitizerConflict => {
                Diagnostic::error("address and thread sanitizers cannot be combined")
                    .with_context("the two instrumentations insert incompatible runtimes")
                    .with_suggestion("Configure two separate runs, one per sanitizer")
            }

            ConfigError::CoverageWithClang { compiler } => {
                Diagnostic::error("code coverage does not link correctly under clang")
                    .with_context(format!("detected compiler: `{}`", compiler))
                    .with_suggestion("Build with a gcc toolchain when coverage is enabled")
                    .with_suggestion("Disable coverage to keep using clang")
            }

            ConfigError::CoverageNeedsStatic {
                requested,
                build_type,
            } => {
                Diagnostic::error("code coverage requires static linking")
                    .with_context(format!(
                        "requested link mode `{}` with build type `{}` and coverage enabled",
                        requested, build_type
                    ))
                    .with_context(
                        "coverage counters only flush correctly when every module is linked statically",
                    )
                    .with_suggestion("Drop the explicit `--link dynamic` request")
                    .with_suggestion("Disable coverage to link dynamically")
            }

            ConfigError::GoldDynamicRelease {
                requested,
                build_type,
            } => {
                Diagnostic::error(
                    "dynamic linking with the gold linker is unsupported in release builds",
                )
                .with_context(format!(
                    "requested link mode `{}` resolved to dynamic for build type `{}` under gold",
                    requested, build_type
                ))
                .with_context("gold silently drops symbols required by release shared objects")
                .with_suggestion("Link statically with `--link static`")
                .with_suggestion("Switch to a non-gold linker for dynamic release builds")
            }

            ConfigError::MissingArtifact { name } => {
                Diagnostic::error(format!(
                    "no static or shared artifact available for `{}`",
                    name
                ))
                .with_context("at least one artifact path must exist for every dependency")
                .with_suggestion(format!(
                    "Declare `static` or `shared` under [thirdparty.{}] in Slipway.toml",
                    name
                ))
                .with_suggestion(format!(
                    "Set the `{}` environment override to a prefix containing the library",
                    crate::core::manifest::home_override_var(name)
                ))
            }

            ConfigError::DuplicateTestTarget {
                identity,
                first,
                second,
            } => {
                Diagnostic::error(format!("duplicate test target `{}`", identity))
                    .with_context(format!("first declared as `{}`", first))
                    .with_context(format!("declared again as `{}`", second))
                    .with_context("a silently overwritten entry would hide a test from the run")
                    .with_suggestion("Rename one of the test sources so the file names differ")
            }

            ConfigError::DependencyCycle { name } => {
                Diagnostic::error(format!(
                    "third-party dependency cycle involving `{}`",
                    name
                ))
                .with_context("library dependencies must form an acyclic graph")
                .with_suggestion(format!(
                    "Remove `{}` from the deps list of one of the libraries in the cycle",
                    name
                ))
            }

            ConfigError::CompilerNotFound { searched } => {
                let mut diag = Diagnostic::error("no c++ compiler found");
                if !searched.is_empty() {
                    diag = diag.with_context(format!("searched for: {}", searched.join(", ")));
                }
                diag.with_suggestion("Install gcc or clang and ensure it is on PATH")
                    .with_suggestion("Point `--toolchain-root` at a prefix containing bin/g++")
            }
        }
    }
}
