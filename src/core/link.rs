//! Link mode request and resolution types.
//!
//! A run starts from a [`LinkRequest`] (user input, default auto) and
//! ends with exactly one [`ResolvedLinkMode`] plus a [`LinkReason`]
//! recording why that mode was chosen. The resolved mode is set once by
//! the resolver and immutable afterwards; every downstream decision
//! (position-independent code, artifact selection) reads it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Requested link mode, supplied externally before resolution begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRequest {
    /// Let the build type pick: debug-family builds link dynamically,
    /// everything else statically.
    Auto,
    /// Force dynamic linking.
    Dynamic,
    /// Force static linking.
    Static,
}

impl Default for LinkRequest {
    fn default() -> Self {
        LinkRequest::Auto
    }
}

impl fmt::Display for LinkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRequest::Auto => write!(f, "auto"),
            LinkRequest::Dynamic => write!(f, "dynamic"),
            LinkRequest::Static => write!(f, "static"),
        }
    }
}

impl FromStr for LinkRequest {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(LinkRequest::Auto),
            "dynamic" => Ok(LinkRequest::Dynamic),
            "static" => Ok(LinkRequest::Static),
            _ => Err(ConfigError::InvalidLinkMode {
                value: s.to_string(),
            }),
        }
    }
}

/// The single resolved link mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedLinkMode {
    Dynamic,
    Static,
}

impl ResolvedLinkMode {
    pub fn is_static(&self) -> bool {
        matches!(self, ResolvedLinkMode::Static)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ResolvedLinkMode::Dynamic)
    }
}

impl fmt::Display for ResolvedLinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedLinkMode::Dynamic => write!(f, "dynamic"),
            ResolvedLinkMode::Static => write!(f, "static"),
        }
    }
}

/// Why the resolver settled on its mode.
///
/// A coverage override must be observable as an explicit override, not
/// a silent default, so it gets its own reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkReason {
    /// The user asked for this mode explicitly.
    Explicit,
    /// Auto request, debug-family build type picked dynamic.
    AutoDebug,
    /// Auto request, release-family build type picked static.
    AutoRelease,
    /// Coverage instrumentation forced the auto request to static.
    CoverageOverride,
}

impl fmt::Display for LinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkReason::Explicit => write!(f, "explicitly requested"),
            LinkReason::AutoDebug => write!(f, "auto: debug-family build"),
            LinkReason::AutoRelease => write!(f, "auto: release-family build"),
            LinkReason::CoverageOverride => write!(f, "forced static by coverage"),
        }
    }
}
