//! SPI-NAND chip descriptors and registry
//!
//! This module provides the geometry description of a SPI-NAND chip and
//! the static, ordered table of known chips used for identification.

mod registry;
mod types;

pub use registry::*;
pub use types::*;
