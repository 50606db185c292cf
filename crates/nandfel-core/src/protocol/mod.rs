//! Protocol implementations
//!
//! This module contains the SPI-NAND instruction set and the register-level
//! command sequences built on top of the command interpreter.

pub mod opcodes;
mod spinand;

pub use spinand::*;
