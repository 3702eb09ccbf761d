//! Sanitizer selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A single compiler-assisted runtime instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitizer {
    /// AddressSanitizer, detects memory errors.
    Address,
    /// ThreadSanitizer, detects data races.
    Thread,
}

impl fmt::Display for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sanitizer::Address => write!(f, "address"),
            Sanitizer::Thread => write!(f, "thread"),
        }
    }
}

impl FromStr for Sanitizer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "address" | "asan" => Ok(Sanitizer::Address),
            "thread" | "tsan" => Ok(Sanitizer::Thread),
            _ => Err(ConfigError::UnknownSanitizer {
                value: s.to_string(),
            }),
        }
    }
}

/// The set of sanitizers enabled for a run. Read-only during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerSet {
    #[serde(default)]
    pub address: bool,
    #[serde(default)]
    pub thread: bool,
}

impl SanitizerSet {
    pub const EMPTY: SanitizerSet = SanitizerSet {
        address: false,
        thread: false,
    };

    /// Build a set from individual sanitizers.
    pub fn from_sanitizers(sanitizers: &[Sanitizer]) -> Self {
        let mut set = SanitizerSet::EMPTY;
        for s in sanitizers {
            set.insert(*s);
        }
        set
    }

    pub fn insert(&mut self, sanitizer: Sanitizer) {
        match sanitizer {
            Sanitizer::Address => self.address = true,
            Sanitizer::Thread => self.thread = true,
        }
    }

    pub fn contains(&self, sanitizer: Sanitizer) -> bool {
        match sanitizer {
            Sanitizer::Address => self.address,
            Sanitizer::Thread => self.thread,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.address && !self.thread
    }

    /// Reject combinations that cannot share a process.
    ///
    /// Address and thread instrumentation each insert their own runtime
    /// and the two runtimes cannot coexist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address && self.thread {
            return Err(ConfigError::SanitizerConflict);
        }
        Ok(())
    }

    /// Names of the enabled sanitizers, in fixed order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.address {
            names.push("address");
        }
        if self.thread {
            names.push("thread");
        }
        names
    }
}

impl fmt::Display for SanitizerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.names().join(","))
        }
    }
}

impl FromStr for SanitizerSet {
    type Err = ConfigError;

    /// Parse a comma-separated sanitizer list, e.g. `address` or
    /// `address,thread`. Empty input yields the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = SanitizerSet::EMPTY;
        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            set.insert(token.parse()?);
        }
        Ok(set)
    }
}
