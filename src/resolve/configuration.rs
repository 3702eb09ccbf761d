//! The per-run configuration aggregate.

use tracing::{debug, info};

use crate::core::build_type::BuildType;
use crate::core::link::{LinkRequest, ResolvedLinkMode};
use crate::core::sanitizer::SanitizerSet;
use crate::errors::ConfigError;
use crate::probe::{CompilerFamily, LinkerFamily, PlatformProbe};
use crate::resolve::flags::{self, FlagSet};
use crate::resolve::link_mode::{self, LinkInputs, LinkResolution};

/// Everything a configuration run decided, in one place.
///
/// Constructed exactly once per run; every downstream consumer (the
/// dependency registrar, the plan assembler) holds read access only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub build_type: BuildType,
    pub compiler_family: CompilerFamily,
    pub linker_family: LinkerFamily,
    pub sanitizers: SanitizerSet,
    pub coverage: bool,
    pub link: LinkResolution,
    pub flags: FlagSet,
}

impl BuildConfiguration {
    /// Run the resolution pass: validate sanitizers, build base flags,
    /// settle the link mode, then finalize the flag set. Any fatal
    /// condition aborts before anything downstream can observe a
    /// partial configuration.
    pub fn resolve(
        build_type: BuildType,
        requested: LinkRequest,
        sanitizers: SanitizerSet,
        coverage: bool,
        probe: &dyn PlatformProbe,
    ) -> Result<BuildConfiguration, ConfigError> {
        sanitizers.validate()?;

        let compiler_family = probe.compiler_family();
        let linker_family = probe.linker_family();

        let base = flags::base_flags(build_type, compiler_family, probe.supports_color());

        let link = link_mode::resolve(LinkInputs {
            requested,
            build_type,
            coverage,
            compiler_family,
            linker_family,
        })?;

        for note in &link.notes {
            info!("{}", note);
        }

        let flags = flags::finalize(&base, link.mode, sanitizers, coverage);
        debug!(
            "resolved {} build, {} linking, {} flags",
            build_type,
            link.mode,
            flags.len()
        );

        Ok(BuildConfiguration {
            build_type,
            compiler_family,
            linker_family,
            sanitizers,
            coverage,
            link,
            flags,
        })
    }

    /// The single resolved link mode.
    pub fn mode(&self) -> ResolvedLinkMode {
        self.link.mode
    }

    /// Whether produced objects carry position-independent code.
    pub fn pic_enabled(&self) -> bool {
        self.link.mode.is_dynamic()
    }
}
