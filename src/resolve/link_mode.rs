//! Link-mode resolution.
//!
//! The resolver is a pipeline of pure rules over an immutable input
//! struct, composed left-to-right. The order is load-bearing: the
//! coverage rule runs before auto resolution so a forced-static request
//! can never auto-resolve to dynamic, and the gold check runs last
//! because it needs the settled mode. Each rule either passes the state
//! through (possibly annotated) or fails the whole run.
//!
//! Token validation (`auto|dynamic|static`) happens at the input
//! boundary in [`LinkRequest::from_str`]; the pipeline starts from the
//! typed request.

use serde::Serialize;

use crate::core::build_type::BuildType;
use crate::core::link::{LinkReason, LinkRequest, ResolvedLinkMode};
use crate::errors::ConfigError;
use crate::probe::{CompilerFamily, LinkerFamily};

/// Immutable inputs to link-mode resolution.
#[derive(Debug, Clone, Copy)]
pub struct LinkInputs {
    pub requested: LinkRequest,
    pub build_type: BuildType,
    pub coverage: bool,
    pub compiler_family: CompilerFamily,
    pub linker_family: LinkerFamily,
}

/// Outcome of resolution: the mode, why it was chosen, and the
/// informational notes accumulated along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkResolution {
    pub mode: ResolvedLinkMode,
    pub reason: LinkReason,
    pub notes: Vec<String>,
}

/// State before a mode has been chosen. The requested mode is still
/// mutable here; nothing after [`rule_choose`] may touch it.
#[derive(Debug, Clone)]
struct Pending {
    inputs: LinkInputs,
    requested: LinkRequest,
    forced: Option<LinkReason>,
    notes: Vec<String>,
}

/// State after the mode is settled. Later rules may only validate or
/// annotate it.
#[derive(Debug, Clone)]
struct Settled {
    inputs: LinkInputs,
    mode: ResolvedLinkMode,
    reason: LinkReason,
    notes: Vec<String>,
}

/// Run the full rule pipeline.
pub fn resolve(inputs: LinkInputs) -> Result<LinkResolution, ConfigError> {
    let pending = Pending {
        requested: inputs.requested,
        inputs,
        forced: None,
        notes: Vec::new(),
    };

    let pending = rule_coverage(pending)?;
    let settled = rule_choose(pending)?;
    let settled = rule_gold(settled)?;

    Ok(LinkResolution {
        mode: settled.mode,
        reason: settled.reason,
        notes: settled.notes,
    })
}

/// Coverage rule. Clang cannot link coverage-instrumented objects in
/// this toolchain combination, and coverage counters only flush
/// correctly under static linking, so an explicit dynamic request is
/// rejected and an auto request is forced to static.
fn rule_coverage(mut p: Pending) -> Result<Pending, ConfigError> {
    if !p.inputs.coverage {
        return Ok(p);
    }

    if p.inputs.compiler_family == CompilerFamily::Clang {
        return Err(ConfigError::CoverageWithClang {
            compiler: p.inputs.compiler_family.to_string(),
        });
    }

    match p.requested {
        LinkRequest::Dynamic => Err(ConfigError::CoverageNeedsStatic {
            requested: p.requested,
            build_type: p.inputs.build_type,
        }),
        LinkRequest::Auto => {
            p.requested = LinkRequest::Static;
            p.forced = Some(LinkReason::CoverageOverride);
            p.notes
                .push("coverage enabled, forcing the auto link request to static".to_string());
            Ok(p)
        }
        LinkRequest::Static => Ok(p),
    }
}

/// Mode selection. Auto picks dynamic for debug-family builds
/// (iteration speed) and static for everything else; explicit requests
/// pass through. The mode is set exactly once, here.
fn rule_choose(p: Pending) -> Result<Settled, ConfigError> {
    let (mode, reason, note) = match p.requested {
        LinkRequest::Auto => {
            if p.inputs.build_type.is_debug_family() {
                (
                    ResolvedLinkMode::Dynamic,
                    LinkReason::AutoDebug,
                    Some("auto link request resolved to dynamic for debug iteration speed"),
                )
            } else {
                (
                    ResolvedLinkMode::Static,
                    LinkReason::AutoRelease,
                    Some("auto link request resolved to static for optimized builds"),
                )
            }
        }
        LinkRequest::Dynamic => (
            ResolvedLinkMode::Dynamic,
            LinkReason::Explicit,
            Some("dynamic linking explicitly requested"),
        ),
        LinkRequest::Static => match p.forced {
            // The coverage rule already recorded its note.
            Some(reason) => (ResolvedLinkMode::Static, reason, None),
            None => (
                ResolvedLinkMode::Static,
                LinkReason::Explicit,
                Some("static linking explicitly requested"),
            ),
        },
    };

    let mut notes = p.notes;
    if let Some(note) = note {
        notes.push(note.to_string());
    }

    Ok(Settled {
        inputs: p.inputs,
        mode,
        reason,
        notes,
    })
}

/// Gold rule. Gold silently drops symbols required by release shared
/// objects; every other gold combination is accepted with a note.
fn rule_gold(mut s: Settled) -> Result<Settled, ConfigError> {
    if s.inputs.linker_family == LinkerFamily::Gold {
        if s.mode.is_dynamic() && s.inputs.build_type == BuildType::Release {
            return Err(ConfigError::GoldDynamicRelease {
                requested: s.inputs.requested,
                build_type: s.inputs.build_type,
            });
        }
        s.notes.push(format!(
            "gold linker detected, accepted with {} linking in a {} build",
            s.mode, s.inputs.build_type
        ));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        requested: LinkRequest,
        build_type: BuildType,
        coverage: bool,
        compiler_family: CompilerFamily,
        linker_family: LinkerFamily,
    ) -> LinkInputs {
        LinkInputs {
            requested,
            build_type,
            coverage,
            compiler_family,
            linker_family,
        }
    }

    fn auto(build_type: BuildType) -> LinkInputs {
        inputs(
            LinkRequest::Auto,
            build_type,
            false,
            CompilerFamily::Gnu,
            LinkerFamily::Other,
        )
    }

    #[test]
    fn test_auto_resolution_by_build_type() {
        for build_type in BuildType::ALL {
            let resolution = resolve(auto(build_type)).unwrap();
            if build_type.is_debug_family() {
                assert_eq!(resolution.mode, ResolvedLinkMode::Dynamic);
                assert_eq!(resolution.reason, LinkReason::AutoDebug);
            } else {
                assert_eq!(resolution.mode, ResolvedLinkMode::Static);
                assert_eq!(resolution.reason, LinkReason::AutoRelease);
            }
        }
    }

    #[test]
    fn test_explicit_requests_are_respected() {
        let resolution = resolve(inputs(
            LinkRequest::Static,
            BuildType::Debug,
            false,
            CompilerFamily::Gnu,
            LinkerFamily::Other,
        ))
        .unwrap();
        assert_eq!(resolution.mode, ResolvedLinkMode::Static);
        assert_eq!(resolution.reason, LinkReason::Explicit);

        let resolution = resolve(inputs(
            LinkRequest::Dynamic,
            BuildType::Release,
            false,
            CompilerFamily::Gnu,
            LinkerFamily::Other,
        ))
        .unwrap();
        assert_eq!(resolution.mode, ResolvedLinkMode::Dynamic);
        assert_eq!(resolution.reason, LinkReason::Explicit);
    }

    #[test]
    fn test_coverage_forces_auto_to_static() {
        for build_type in BuildType::ALL {
            let resolution = resolve(inputs(
                LinkRequest::Auto,
                build_type,
                true,
                CompilerFamily::Gnu,
                LinkerFamily::Other,
            ))
            .unwrap();

            assert_eq!(resolution.mode, ResolvedLinkMode::Static);
            assert_eq!(resolution.reason, LinkReason::CoverageOverride);
            assert!(resolution.notes.iter().any(|n| n.contains("coverage")));
        }
    }

    #[test]
    fn test_coverage_with_explicit_static_is_not_an_override() {
        let resolution = resolve(inputs(
            LinkRequest::Static,
            BuildType::Release,
            true,
            CompilerFamily::Gnu,
            LinkerFamily::Other,
        ))
        .unwrap();

        assert_eq!(resolution.mode, ResolvedLinkMode::Static);
        assert_eq!(resolution.reason, LinkReason::Explicit);
    }

    #[test]
    fn test_coverage_rejects_clang_regardless_of_other_inputs() {
        for build_type in BuildType::ALL {
            for requested in [LinkRequest::Auto, LinkRequest::Dynamic, LinkRequest::Static] {
                let err = resolve(inputs(
                    requested,
                    build_type,
                    true,
                    CompilerFamily::Clang,
                    LinkerFamily::Other,
                ))
                .unwrap_err();
                assert!(matches!(err, ConfigError::CoverageWithClang { .. }));
            }
        }
    }

    #[test]
    fn test_coverage_rejects_explicit_dynamic() {
        let err = resolve(inputs(
            LinkRequest::Dynamic,
            BuildType::Debug,
            true,
            CompilerFamily::Gnu,
            LinkerFamily::Other,
        ))
        .unwrap_err();

        match err {
            ConfigError::CoverageNeedsStatic {
                requested,
                build_type,
            } => {
                assert_eq!(requested, LinkRequest::Dynamic);
                assert_eq!(build_type, BuildType::Debug);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gold_dynamic_release_is_fatal() {
        let err = resolve(inputs(
            LinkRequest::Dynamic,
            BuildType::Release,
            false,
            CompilerFamily::Gnu,
            LinkerFamily::Gold,
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::GoldDynamicRelease { .. }));
    }

    #[test]
    fn test_gold_static_always_succeeds() {
        for build_type in BuildType::ALL {
            let resolution = resolve(inputs(
                LinkRequest::Static,
                build_type,
                false,
                CompilerFamily::Gnu,
                LinkerFamily::Gold,
            ))
            .unwrap();

            assert_eq!(resolution.mode, ResolvedLinkMode::Static);
            assert!(resolution.notes.iter().any(|n| n.contains("gold")));
        }
    }

    #[test]
    fn test_gold_dynamic_is_accepted_outside_release() {
        // Only the release combination drops symbols; a debug-family
        // auto resolution to dynamic passes with a note.
        let resolution = resolve(inputs(
            LinkRequest::Auto,
            BuildType::Debug,
            false,
            CompilerFamily::Gnu,
            LinkerFamily::Gold,
        ))
        .unwrap();

        assert_eq!(resolution.mode, ResolvedLinkMode::Dynamic);
        assert!(resolution.notes.iter().any(|n| n.contains("gold")));
    }

    #[test]
    fn test_gold_note_absent_for_other_linkers() {
        let resolution = resolve(auto(BuildType::Release)).unwrap();
        assert!(!resolution.notes.iter().any(|n| n.contains("gold")));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = inputs(
            LinkRequest::Auto,
            BuildType::FastDebug,
            false,
            CompilerFamily::Clang,
            LinkerFamily::Gold,
        );
        assert_eq!(resolve(input).unwrap(), resolve(input).unwrap());
    }

    #[test]
    fn test_coverage_rule_in_isolation() {
        let pending = Pending {
            inputs: inputs(
                LinkRequest::Auto,
                BuildType::Debug,
                true,
                CompilerFamily::Gnu,
                LinkerFamily::Other,
            ),
            requested: LinkRequest::Auto,
            forced: None,
            notes: Vec::new(),
        };

        let after = rule_coverage(pending).unwrap();
        assert_eq!(after.requested, LinkRequest::Static);
        assert_eq!(after.forced, Some(LinkReason::CoverageOverride));
    }

    #[test]
    fn test_gold_rule_in_isolation() {
        let settled = Settled {
            inputs: inputs(
                LinkRequest::Dynamic,
                BuildType::Release,
                false,
                CompilerFamily::Gnu,
                LinkerFamily::Gold,
            ),
            mode: ResolvedLinkMode::Dynamic,
            reason: LinkReason::Explicit,
            notes: Vec::new(),
        };

        assert!(matches!(
            rule_gold(settled),
            Err(ConfigError::GoldDynamicRelease { .. })
        ));
    }
}
