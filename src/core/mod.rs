//! Core data structures for Slipway.
//!
//! This module contains the foundational types used throughout Slipway:
//! - Build type and link mode enumerations
//! - Sanitizer selection
//! - The project manifest (Slipway.toml)

pub mod build_type;
pub mod link;
pub mod manifest;
pub mod sanitizer;

pub use build_type::BuildType;
pub use link::{LinkReason, LinkRequest, ResolvedLinkMode};
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use sanitizer::{Sanitizer, SanitizerSet};
