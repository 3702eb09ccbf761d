//! Implementation of `slipway configure`.
//!
//! Runs the whole resolution pass: effective inputs, manifest, host
//! probe, link-mode and flag resolution, dependency and target
//! registration, plan assembly. Every read-only command reuses this
//! operation and projects a different view of the resulting plan.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::core::build_type::BuildType;
use crate::core::link::LinkRequest;
use crate::core::sanitizer::SanitizerSet;
use crate::plan::BuildPlan;
use crate::probe::host::HostProbe;
use crate::registry::{TargetRegistry, ThirdPartyRegistry};
use crate::resolve::configuration::BuildConfiguration;
use crate::util::context::GlobalContext;

/// Options for the configure operation.
///
/// Parseable fields stay raw strings here so command line, environment
/// and config file values all go through the same fatal validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Requested build type (debug, fastdebug, release, profile_gen,
    /// profile_build)
    pub build_type: Option<String>,

    /// Requested link mode (auto, dynamic, static)
    pub link: Option<String>,

    /// Comma-separated sanitizers (address, thread)
    pub sanitize: Option<String>,

    /// Enable coverage instrumentation
    pub coverage: bool,

    /// Whether test targets are registered
    pub tests: Option<bool>,

    /// Toolchain prefix whose bin/ holds the compilers
    pub toolchain_root: Option<PathBuf>,
}

/// Resolve a full build configuration and assemble the plan.
pub fn configure(ctx: &GlobalContext, opts: &ConfigureOptions) -> Result<BuildPlan> {
    // Explicit inputs are validated before any filesystem or toolchain
    // work, so a typo fails the same way on every machine.
    let explicit_build_type: Option<BuildType> =
        opts.build_type.as_deref().map(str::parse).transpose()?;
    let explicit_link: Option<LinkRequest> = opts.link.as_deref().map(str::parse).transpose()?;
    let sanitizers = match opts.sanitize.as_deref() {
        Some(list) => list.parse::<SanitizerSet>()?,
        None => SanitizerSet::EMPTY,
    };

    let manifest = ctx.load_manifest()?;
    let project_root = manifest.manifest_dir.clone();
    debug!("configuring `{}` at {}", manifest.project.name, project_root.display());

    let settings = ctx.load_settings(&project_root);

    let build_type = match explicit_build_type {
        Some(build_type) => build_type,
        None => settings.build_type()?.unwrap_or_default(),
    };
    let requested = match explicit_link {
        Some(request) => request,
        None => settings.link()?.unwrap_or_default(),
    };
    let tests_enabled = opts.tests.or(settings.build.tests).unwrap_or(true);
    let toolchain_root = opts
        .toolchain_root
        .clone()
        .or_else(|| settings.build.toolchain_root.clone());

    let probe = HostProbe::detect(toolchain_root.as_deref())?;

    let configuration =
        BuildConfiguration::resolve(build_type, requested, sanitizers, opts.coverage, &probe)?;

    let mut libraries = ThirdPartyRegistry::new();
    for (name, spec) in &manifest.thirdparty {
        libraries.register_spec(configuration.mode(), name, spec, &project_root)?;
    }

    let output_dir = project_root.join("build").join(build_type.to_string());
    let mut targets = TargetRegistry::new(&manifest, tests_enabled, output_dir.join("bin"));
    for test in &manifest.tests {
        targets.register_test(&test.path, &test.properties)?;
    }
    for tool in &manifest.tools {
        targets.register_tool(&tool.name, &tool.command);
    }

    let plan = BuildPlan::assemble(
        &manifest,
        &configuration,
        &probe,
        &libraries,
        &targets,
        output_dir,
    )?;

    info!(
        "configured `{}`: {} build, {} linking, {} libraries, {} tests",
        plan.project,
        plan.build_type,
        plan.link.mode,
        plan.libraries.len(),
        plan.tests.len()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::link::LinkReason;
    use crate::core::ResolvedLinkMode;
    use crate::errors::ConfigError;
    use crate::test_support::project_fixture;

    /// A prefix with an empty bin/g++ so detection is name-based and
    /// never shells out to a real compiler.
    fn fake_toolchain() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("g++"), "").unwrap();
        dir
    }

    fn options_with_root(toolchain: &tempfile::TempDir) -> ConfigureOptions {
        ConfigureOptions {
            toolchain_root: Some(toolchain.path().to_path_buf()),
            ..ConfigureOptions::default()
        }
    }

    #[test]
    fn test_configure_produces_plan() {
        let (dir, _manifest) = project_fixture();
        let toolchain = fake_toolchain();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let opts = ConfigureOptions {
            build_type: Some("release".to_string()),
            link: Some("auto".to_string()),
            tests: Some(true),
            ..options_with_root(&toolchain)
        };
        let plan = configure(&ctx, &opts).unwrap();

        assert_eq!(plan.project, "quill");
        assert_eq!(plan.build_type, BuildType::Release);
        assert_eq!(plan.link.mode, ResolvedLinkMode::Static);
        assert!(plan.output_dir.ends_with("build/release"));
        assert_eq!(plan.libraries.len(), 3);
        assert_eq!(plan.tests.len(), 2);
        assert_eq!(plan.tools.len(), 1);
    }

    #[test]
    fn test_invalid_build_type_fails_before_probe() {
        let (dir, _manifest) = project_fixture();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        // The toolchain root points nowhere; a probe would fail with
        // CompilerNotFound, so seeing UnknownBuildType proves input
        // validation ran first.
        let opts = ConfigureOptions {
            build_type: Some("turbo".to_string()),
            toolchain_root: Some(PathBuf::from("/nonexistent/toolchain")),
            ..ConfigureOptions::default()
        };
        let err = configure(&ctx, &opts).unwrap_err();
        let err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::UnknownBuildType { .. }));
    }

    #[test]
    fn test_cli_overrides_project_settings() {
        let (dir, _manifest) = project_fixture();
        let toolchain = fake_toolchain();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let config_dir = dir.path().join(".slipway");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[build]\nbuild-type = \"release\"\n",
        )
        .unwrap();

        let from_settings = configure(&ctx, &options_with_root(&toolchain)).unwrap();
        assert_eq!(from_settings.build_type, BuildType::Release);

        let opts = ConfigureOptions {
            build_type: Some("fastdebug".to_string()),
            ..options_with_root(&toolchain)
        };
        let from_cli = configure(&ctx, &opts).unwrap();
        assert_eq!(from_cli.build_type, BuildType::FastDebug);
    }

    #[test]
    fn test_tests_gate_skips_registration() {
        let (dir, _manifest) = project_fixture();
        let toolchain = fake_toolchain();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let opts = ConfigureOptions {
            tests: Some(false),
            ..options_with_root(&toolchain)
        };
        let plan = configure(&ctx, &opts).unwrap();

        assert!(plan.tests.is_empty());
        assert_eq!(plan.tools.len(), 1);
    }

    #[test]
    fn test_coverage_forces_static_with_provenance() {
        let (dir, _manifest) = project_fixture();
        let toolchain = fake_toolchain();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let opts = ConfigureOptions {
            build_type: Some("debug".to_string()),
            link: Some("auto".to_string()),
            coverage: true,
            ..options_with_root(&toolchain)
        };
        let plan = configure(&ctx, &opts).unwrap();

        assert_eq!(plan.link.mode, ResolvedLinkMode::Static);
        assert_eq!(plan.link.reason, LinkReason::CoverageOverride);
        assert!(plan.flags.contains("-fprofile-arcs"));
    }

    #[test]
    fn test_sanitizer_conflict_is_fatal() {
        let (dir, _manifest) = project_fixture();
        let toolchain = fake_toolchain();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let opts = ConfigureOptions {
            sanitize: Some("address,thread".to_string()),
            ..options_with_root(&toolchain)
        };
        let err = configure(&ctx, &opts).unwrap_err();
        let err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::SanitizerConflict));
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(dir.path().to_path_buf());

        let err = configure(&ctx, &ConfigureOptions::default()).unwrap_err();
        assert!(err.to_string().contains("could not find Slipway.toml"));
    }
}
