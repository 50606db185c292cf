//! SPI-NAND instruction set
//!
//! Instruction bytes and feature register addresses shared by the
//! SPI-NAND parts in the registry.

// ============================================================================
// Identification and reset
// ============================================================================

/// Read ID
pub const RDID: u8 = 0x9F;
/// Device reset
pub const RESET: u8 = 0xFF;

// ============================================================================
// Feature registers
// ============================================================================

/// Get Feature: `0x0F, addr` then one byte in
pub const GET_FEATURE: u8 = 0x0F;
/// Set Feature: `0x1F, addr, value`
pub const SET_FEATURE: u8 = 0x1F;

/// Protection register address (block protect bits)
pub const FEATURE_PROTECT: u8 = 0xA0;
/// Configuration register address (ECC enable, buffer mode)
pub const FEATURE_CONFIG: u8 = 0xB0;
/// Status register address (busy, WEL, program/erase fail, ECC status)
pub const FEATURE_STATUS: u8 = 0xC0;

// ============================================================================
// Array operations
// ============================================================================

/// Write Enable - required before program execute and block erase
pub const WREN: u8 = 0x06;
/// Block Erase: `0xD8, row(3)`
pub const BLOCK_ERASE: u8 = 0xD8;
/// Page Read to Cache: `0x13, row(3)`
pub const PAGE_TO_CACHE: u8 = 0x13;
/// Read from Cache: `0x03, column(2), dummy`
pub const READ_FROM_CACHE: u8 = 0x03;
/// Fast Read from Cache (not used by the batch path)
pub const FAST_READ_FROM_CACHE: u8 = 0x0B;
/// Program Load: `0x02, column(2)` then data
pub const PROGRAM_LOAD: u8 = 0x02;
/// Program Execute: `0x10, row(3)`
pub const PROGRAM_EXEC: u8 = 0x10;

/// Largest row address the 3-byte row field can carry
pub const MAX_ROW: u32 = 0x00FF_FFFF;
