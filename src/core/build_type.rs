//! Build type selection.
//!
//! Exactly one build type is active per configuration run. It is chosen
//! once, before any resolution starts, and never changes afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Optimization/debug profile for a single configuration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    /// Debug symbols, no optimization.
    #[serde(rename = "debug")]
    Debug,
    /// Debug symbols plus light optimization.
    #[serde(rename = "fastdebug")]
    FastDebug,
    /// Full optimization, symbols kept, assertions disabled.
    #[serde(rename = "release")]
    Release,
    /// Release flags plus profile-generation instrumentation.
    #[serde(rename = "profile_gen")]
    ProfileGen,
    /// Release flags consuming previously generated profile data.
    #[serde(rename = "profile_build")]
    ProfileBuild,
}

impl BuildType {
    /// All build types, in declaration order.
    pub const ALL: [BuildType; 5] = [
        BuildType::Debug,
        BuildType::FastDebug,
        BuildType::Release,
        BuildType::ProfileGen,
        BuildType::ProfileBuild,
    ];

    /// Whether this is one of the fast-iteration profiles.
    ///
    /// Debug-family builds resolve `auto` link requests to dynamic
    /// linking; everything else links statically.
    pub fn is_debug_family(&self) -> bool {
        matches!(self, BuildType::Debug | BuildType::FastDebug)
    }

    /// Whether this build type carries release optimization flags.
    pub fn is_release_family(&self) -> bool {
        matches!(
            self,
            BuildType::Release | BuildType::ProfileGen | BuildType::ProfileBuild
        )
    }
}

impl Default for BuildType {
    fn default() -> Self {
        // The default only covers the unset case; an invalid explicit
        // value is always a fatal error, never coerced here.
        BuildType::Debug
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Debug => write!(f, "debug"),
            BuildType::FastDebug => write!(f, "fastdebug"),
            BuildType::Release => write!(f, "release"),
            BuildType::ProfileGen => write!(f, "profile_gen"),
            BuildType::ProfileBuild => write!(f, "profile_build"),
        }
    }
}

impl FromStr for BuildType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "fastdebug" => Ok(BuildType::FastDebug),
            "release" => Ok(BuildType::Release),
            "profile_gen" => Ok(BuildType::ProfileGen),
            "profile_build" => Ok(BuildType::ProfileBuild),
            _ => Err(ConfigError::UnknownBuildType {
                value: s.to_string(),
            }),
        }
    }
}
