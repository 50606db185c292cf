//! Session parameters - runtime state for flash operations

use crate::chip::ChipDescriptor;
use crate::error::{Error, Result};
use crate::protocol::opcodes::MAX_ROW;
use crate::transport::SwapInfo;

/// Parameters of one programming session
///
/// Created by [`init`](super::init) and read-only afterwards. Sessions are
/// never shared; the target handles one command stream at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The identified chip
    pub chip: &'static ChipDescriptor,
    /// Target buffers reported by the transport
    pub swap: SwapInfo,
}

impl Session {
    /// Create a session for an identified chip
    pub fn new(chip: &'static ChipDescriptor, swap: SwapInfo) -> Self {
        Self { chip, swap }
    }

    /// Page data size in bytes
    pub fn page_size(&self) -> usize {
        self.chip.page_size as usize
    }

    /// Base address of the swap buffer
    pub fn swap_base(&self) -> u32 {
        self.swap.swap_base
    }

    /// Length of the swap buffer in bytes
    pub fn swap_len(&self) -> usize {
        self.swap.swap_len as usize
    }

    /// Maximum command stream length in bytes
    pub fn cmd_len(&self) -> usize {
        self.swap.cmd_len as usize
    }

    /// Check that every page of the chip fits a 3-byte row address
    pub fn check_addressable(&self) -> Result<()> {
        let last = self.chip.total_pages().saturating_sub(1);
        if last > MAX_ROW {
            return Err(Error::AddressOutOfRange { page: last });
        }
        Ok(())
    }
}
