//! High-level operations.
//!
//! This module contains the implementation of slipway commands.

pub mod configure;

pub use configure::{configure, ConfigureOptions};
