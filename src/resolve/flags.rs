//! Compiler flag assembly.
//!
//! Flags are collected into an ordered token sequence because later
//! tokens override earlier ones for some toolchains. Assembly happens
//! in two steps: [`base_flags`] before link resolution (common flags,
//! build-type table, compiler-family adjustments) and [`finalize`]
//! afterwards (instrumentation and position-independent code, which
//! depend on the resolved mode).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::build_type::BuildType;
use crate::core::link::ResolvedLinkMode;
use crate::core::sanitizer::SanitizerSet;
use crate::probe::CompilerFamily;

/// Flags shared by every build type: language standard, strict-aliasing
/// relaxation, warning policy, threading, format-macro definitions.
const COMMON_FLAGS: &[&str] = &[
    "-std=c++11",
    "-fno-strict-aliasing",
    "-Wall",
    "-Wno-deprecated",
    "-pthread",
    "-D__STDC_FORMAT_MACROS",
];

const DEBUG_FLAGS: &[&str] = &["-ggdb"];
const FASTDEBUG_FLAGS: &[&str] = &["-ggdb", "-O1"];
const RELEASE_FLAGS: &[&str] = &["-O3", "-g", "-DNDEBUG"];
const PROFILE_GEN_FLAG: &str = "-fprofile-generate";
const PROFILE_USE_FLAG: &str = "-fprofile-use";

const CLANG_FLAGS: &[&str] = &["-Qunused-arguments", "-Wno-c++11-extensions"];
const CLANG_COLOR_FLAG: &str = "-fcolor-diagnostics";

const COVERAGE_FLAGS: &[&str] = &["-fprofile-arcs", "-ftest-coverage"];
const ASAN_FLAGS: &[&str] = &["-fsanitize=address", "-DADDRESS_SANITIZER"];
const TSAN_FLAGS: &[&str] = &["-fsanitize=thread", "-DTHREAD_SANITIZER"];
const PIC_FLAG: &str = "-fPIC";

/// An ordered sequence of compiler flag tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet {
    tokens: Vec<String>,
}

impl FlagSet {
    pub fn new() -> Self {
        FlagSet { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    pub fn extend_from(&mut self, tokens: &[&str]) {
        self.tokens.extend(tokens.iter().map(|t| t.to_string()));
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Build the pre-resolution flag set.
///
/// `color` is the probe's verdict on whether stderr can render color
/// diagnostics; it only matters for clang and never affects produced
/// binaries.
pub fn base_flags(build_type: BuildType, family: CompilerFamily, color: bool) -> FlagSet {
    let mut flags = FlagSet::new();
    flags.extend_from(COMMON_FLAGS);

    match build_type {
        BuildType::Debug => flags.extend_from(DEBUG_FLAGS),
        BuildType::FastDebug => flags.extend_from(FASTDEBUG_FLAGS),
        BuildType::Release => flags.extend_from(RELEASE_FLAGS),
        BuildType::ProfileGen => {
            flags.extend_from(RELEASE_FLAGS);
            flags.push(PROFILE_GEN_FLAG);
        }
        BuildType::ProfileBuild => {
            flags.extend_from(RELEASE_FLAGS);
            flags.push(PROFILE_USE_FLAG);
        }
    }

    if family == CompilerFamily::Clang {
        flags.extend_from(CLANG_FLAGS);
        if color {
            flags.push(CLANG_COLOR_FLAG);
        }
    }

    flags
}

/// Complete the flag set once the link mode is known.
///
/// Instrumentation tokens come first, the PIC token last; the fixed
/// order keeps identical inputs producing identical token sequences.
pub fn finalize(
    base: &FlagSet,
    mode: ResolvedLinkMode,
    sanitizers: SanitizerSet,
    coverage: bool,
) -> FlagSet {
    let mut flags = base.clone();

    if coverage {
        flags.extend_from(COVERAGE_FLAGS);
    }
    if sanitizers.address {
        flags.extend_from(ASAN_FLAGS);
    }
    if sanitizers.thread {
        flags.extend_from(TSAN_FLAGS);
    }

    // Shared objects need position-independent code; static builds
    // deliberately omit it.
    if mode.is_dynamic() {
        flags.push(PIC_FLAG);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_flags_come_first() {
        let flags = base_flags(BuildType::Debug, CompilerFamily::Gnu, false);
        assert_eq!(flags.tokens()[0], "-std=c++11");
        assert!(flags.contains("-Wall"));
        assert!(flags.contains("-pthread"));
        assert!(flags.contains("-D__STDC_FORMAT_MACROS"));
    }

    #[test]
    fn test_debug_flags() {
        let flags = base_flags(BuildType::Debug, CompilerFamily::Gnu, false);
        assert!(flags.contains("-ggdb"));
        assert!(!flags.contains("-O1"));
        assert!(!flags.contains("-O3"));
    }

    #[test]
    fn test_fastdebug_adds_light_optimization() {
        let flags = base_flags(BuildType::FastDebug, CompilerFamily::Gnu, false);
        assert!(flags.contains("-ggdb"));
        assert!(flags.contains("-O1"));
        assert!(!flags.contains("-O3"));
    }

    #[test]
    fn test_release_flags() {
        let flags = base_flags(BuildType::Release, CompilerFamily::Gnu, false);
        assert!(flags.contains("-O3"));
        assert!(flags.contains("-g"));
        assert!(flags.contains("-DNDEBUG"));
        assert!(!flags.contains("-ggdb"));
    }

    #[test]
    fn test_profile_builds_extend_release() {
        let gen = base_flags(BuildType::ProfileGen, CompilerFamily::Gnu, false);
        assert!(gen.contains("-O3"));
        assert!(gen.contains("-fprofile-generate"));
        assert!(!gen.contains("-fprofile-use"));

        let build = base_flags(BuildType::ProfileBuild, CompilerFamily::Gnu, false);
        assert!(build.contains("-O3"));
        assert!(build.contains("-fprofile-use"));
        assert!(!build.contains("-fprofile-generate"));
    }

    #[test]
    fn test_clang_adjustments() {
        let clang = base_flags(BuildType::Debug, CompilerFamily::Clang, false);
        assert!(clang.contains("-Qunused-arguments"));
        assert!(clang.contains("-Wno-c++11-extensions"));

        let gnu = base_flags(BuildType::Debug, CompilerFamily::Gnu, false);
        assert!(!gnu.contains("-Qunused-arguments"));
    }

    #[test]
    fn test_color_flag_is_clang_only_and_tty_gated() {
        let colored = base_flags(BuildType::Debug, CompilerFamily::Clang, true);
        assert!(colored.contains("-fcolor-diagnostics"));

        let plain = base_flags(BuildType::Debug, CompilerFamily::Clang, false);
        assert!(!plain.contains("-fcolor-diagnostics"));

        // The probe verdict is ignored for gnu compilers.
        let gnu = base_flags(BuildType::Debug, CompilerFamily::Gnu, true);
        assert!(!gnu.contains("-fcolor-diagnostics"));
    }

    #[test]
    fn test_finalize_adds_pic_only_for_dynamic() {
        let base = base_flags(BuildType::Debug, CompilerFamily::Gnu, false);

        let dynamic = finalize(&base, ResolvedLinkMode::Dynamic, SanitizerSet::EMPTY, false);
        assert!(dynamic.contains("-fPIC"));

        let static_ = finalize(&base, ResolvedLinkMode::Static, SanitizerSet::EMPTY, false);
        assert!(!static_.contains("-fPIC"));
    }

    #[test]
    fn test_finalize_coverage_tokens() {
        let base = base_flags(BuildType::Debug, CompilerFamily::Gnu, false);
        let flags = finalize(&base, ResolvedLinkMode::Static, SanitizerSet::EMPTY, true);

        assert!(flags.contains("-fprofile-arcs"));
        assert!(flags.contains("-ftest-coverage"));
        assert!(!flags.contains("-fPIC"));
    }

    #[test]
    fn test_finalize_sanitizer_tokens() {
        let base = base_flags(BuildType::FastDebug, CompilerFamily::Gnu, false);

        let asan: SanitizerSet = "address".parse().unwrap();
        let flags = finalize(&base, ResolvedLinkMode::Dynamic, asan, false);
        assert!(flags.contains("-fsanitize=address"));
        assert!(flags.contains("-DADDRESS_SANITIZER"));
        assert!(!flags.contains("-fsanitize=thread"));

        let tsan: SanitizerSet = "thread".parse().unwrap();
        let flags = finalize(&base, ResolvedLinkMode::Dynamic, tsan, false);
        assert!(flags.contains("-fsanitize=thread"));
        assert!(flags.contains("-DTHREAD_SANITIZER"));
    }

    #[test]
    fn test_finalize_does_not_mutate_base() {
        let base = base_flags(BuildType::Release, CompilerFamily::Gnu, false);
        let before = base.clone();
        let _ = finalize(&base, ResolvedLinkMode::Dynamic, SanitizerSet::EMPTY, true);
        assert_eq!(base, before);
    }

    #[test]
    fn test_identical_inputs_produce_identical_tokens() {
        let a = base_flags(BuildType::Release, CompilerFamily::Clang, true);
        let b = base_flags(BuildType::Release, CompilerFamily::Clang, true);
        assert_eq!(a, b);

        let fa = finalize(&a, ResolvedLinkMode::Static, SanitizerSet::EMPTY, true);
        let fb = finalize(&b, ResolvedLinkMode::Static, SanitizerSet::EMPTY, true);
        assert_eq!(fa.tokens(), fb.tokens());
    }
}
