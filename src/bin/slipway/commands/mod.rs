//! Command implementations

pub mod completions;
pub mod configure;
pub mod explain;
pub mod flags;
pub mod linkplan;
