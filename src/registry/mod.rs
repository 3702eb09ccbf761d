//! Dependency and target registration.
//!
//! Both registrars run after link-mode resolution: the third-party
//! registrar needs the resolved mode to pick artifacts, and the target
//! registrar needs the tests-enabled gate fixed at startup.

pub mod targets;
pub mod thirdparty;

pub use targets::{TargetRegistry, TestKind, TestTarget, ToolTarget};
pub use thirdparty::{ArtifactChoice, ThirdPartyLibrary, ThirdPartyRegistry};
