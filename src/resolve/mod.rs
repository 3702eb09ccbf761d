//! Flag building and link-mode resolution.
//!
//! This is the decision core of Slipway. `flags` builds the ordered
//! compiler flag set, `link_mode` runs the rule pipeline that settles
//! on a single link mode, and `configuration` ties both together into
//! the per-run [`BuildConfiguration`] aggregate.

pub mod configuration;
pub mod flags;
pub mod link_mode;

pub use configuration::BuildConfiguration;
pub use flags::FlagSet;
pub use link_mode::{LinkInputs, LinkResolution};
