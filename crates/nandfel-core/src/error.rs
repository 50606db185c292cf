//! Error types for nandfel-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Transport errors
    /// A round trip through the transport failed (command stream execution,
    /// bulk read/write, or transport initialization)
    TransportFailure,

    // Chip errors
    /// The identification response matched no registry entry
    UnsupportedChip {
        /// Raw 4-byte response of the last identification attempt
        id: [u8; 4],
    },

    // Initialization errors
    /// A feature register could not be read during initialization
    StatusReadFailed,
    /// The protection register did not read back as zero after clearing it
    ProtectionClearFailed,
    /// The ECC-enable bit did not read back as set after writing it
    EccEnableFailed,

    // Configuration errors
    /// A command stream or staging area would not fit the session buffers
    BufferTooLarge {
        /// Bytes required
        needed: usize,
        /// Bytes available
        capacity: usize,
    },
    /// A page address does not fit the 24-bit row address of the instruction set
    AddressOutOfRange {
        /// Offending page index
        page: u32,
    },

    // Diagnostics
    /// No status register layout is known for this manufacturer
    UnknownStatusLayout {
        /// First ID byte of the identified chip
        manufacturer: u8,
    },

    // Image errors
    /// Image length does not match the device page range
    ImageSizeMismatch {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure => write!(f, "transport round trip failed"),
            Self::UnsupportedChip { id } => write!(
                f,
                "the spi nand flash '0x{:02x}{:02x}{:02x}{:02x}' is not yet supported",
                id[0], id[1], id[2], id[3]
            ),
            Self::StatusReadFailed => write!(f, "error reading feature register"),
            Self::ProtectionClearFailed => {
                write!(f, "unable to clear the block protection register")
            }
            Self::EccEnableFailed => write!(f, "unable to enable on-chip ECC"),
            Self::BufferTooLarge { needed, capacity } => write!(
                f,
                "buffer too large: {} bytes needed, {} bytes available",
                needed, capacity
            ),
            Self::AddressOutOfRange { page } => {
                write!(f, "page {} does not fit a 24-bit row address", page)
            }
            Self::UnknownStatusLayout { manufacturer } => write!(
                f,
                "no status register layout for manufacturer 0x{:02X}",
                manufacturer
            ),
            Self::ImageSizeMismatch { expected, actual } => write!(
                f,
                "image size mismatch: flash {} bytes, image {} bytes",
                expected, actual
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
