//! SPI-NAND protocol implementation
//!
//! Register-level access to a SPI-NAND chip through the command interpreter:
//! a generic chip-select transaction, ID read, reset, feature register get
//! and set, and the busy-wait.
//!
//! Uses `maybe_async` to support both sync and async modes:
//! - With `is_sync` feature: blocking/synchronous
//! - Without `is_sync` feature: async

use bitflags::bitflags;
use maybe_async::maybe_async;

use super::opcodes;
use crate::chip::{self, ChipDescriptor};
use crate::error::{Error, Result};
use crate::stream::{CommandGroup, CommandStream};
use crate::transport::{FelTransport, SwapInfo};

/// Settle time after the RESET instruction
pub const RESET_DELAY_US: u32 = 100_000;

bitflags! {
    /// Configuration register (0xB0) bits common to the supported parts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u8 {
        /// Buffer read mode (Winbond)
        const BUF    = 1 << 3;
        /// On-chip ECC enable
        const ECC_EN = 1 << 4;
        /// OTP area access
        const OTP_EN = 1 << 6;
        /// OTP lock
        const OTP_PRT = 1 << 7;
    }
}

bitflags! {
    /// Status register (0xC0) bits common to the supported parts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Operation in progress
        const OIP    = 1 << 0;
        /// Write enable latch
        const WEL    = 1 << 1;
        /// Last block erase failed
        const E_FAIL = 1 << 2;
        /// Last program execute failed
        const P_FAIL = 1 << 3;
        /// ECC status bit 0
        const ECCS0  = 1 << 4;
        /// ECC status bit 1
        const ECCS1  = 1 << 5;
    }
}

/// Run one chip-select transaction
///
/// `tx` is staged at the start of the swap buffer, transmitted, and the
/// reply is received into the same place and read back into `rx`. Empty
/// buffers skip their phase.
#[maybe_async]
pub async fn spi_xfer<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    tx: &[u8],
    rx: &mut [u8],
) -> Result<()> {
    let largest = tx.len().max(rx.len());
    if largest > swap.swap_len as usize {
        return Err(Error::BufferTooLarge {
            needed: largest,
            capacity: swap.swap_len as usize,
        });
    }

    let mut stream = CommandStream::new(swap.cmd_len as usize);
    stream.push(CommandGroup::Transfer {
        addr: swap.swap_base,
        tx_len: tx.len() as u32,
        rx_len: rx.len() as u32,
    })?;
    let bytes = stream.finish()?;

    if !tx.is_empty() {
        transport.write(swap.swap_base, tx).await?;
    }
    transport.spi_run(&bytes).await?;
    if !rx.is_empty() {
        transport.read(swap.swap_base, rx).await?;
    }
    Ok(())
}

/// Send instruction bytes inline in a command stream
///
/// Used for commands without a reply. The bytes travel in the stream
/// itself, so nothing is staged in the swap buffer.
#[maybe_async]
pub async fn send_instruction<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    bytes: &[u8],
) -> Result<()> {
    let mut stream = CommandStream::new(swap.cmd_len as usize);
    stream.push(CommandGroup::instruction(bytes)?)?;
    transport.spi_run(&stream.finish()?).await
}

/// Read the 4-byte identification response
///
/// With `address_byte` set, RDID is followed by one zero address byte, as
/// most SPI-NAND parts expect. Without it the legacy single-byte form is
/// sent.
#[maybe_async]
pub async fn read_id<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    address_byte: bool,
) -> Result<[u8; 4]> {
    let tx: &[u8] = if address_byte {
        &[opcodes::RDID, 0x00]
    } else {
        &[opcodes::RDID]
    };
    let mut id = [0u8; 4];
    spi_xfer(transport, swap, tx, &mut id).await?;
    Ok(id)
}

/// Identify the attached chip against the registry
///
/// Tries RDID with the address byte first, then the legacy form. The first
/// registry entry matching over its declared ID length wins. If neither
/// response matches, fails with [`Error::UnsupportedChip`] carrying the last
/// raw response.
#[maybe_async]
pub async fn identify<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
) -> Result<&'static ChipDescriptor> {
    let id = read_id(transport, swap, true).await?;
    if let Some(chip) = chip::find_by_id(&id) {
        return Ok(chip);
    }
    log::debug!(
        "RDID with address byte returned {:02x?}, retrying legacy form",
        id
    );

    let id = read_id(transport, swap, false).await?;
    chip::find_by_id(&id).ok_or(Error::UnsupportedChip { id })
}

/// Reset the chip and wait for it to settle
#[maybe_async]
pub async fn reset<T: FelTransport + ?Sized>(transport: &mut T, swap: &SwapInfo) -> Result<()> {
    send_instruction(transport, swap, &[opcodes::RESET]).await?;
    transport.delay_us(RESET_DELAY_US).await;
    Ok(())
}

/// Read a feature register
#[maybe_async]
pub async fn get_feature<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    addr: u8,
) -> Result<u8> {
    let mut val = [0u8; 1];
    spi_xfer(transport, swap, &[opcodes::GET_FEATURE, addr], &mut val).await?;
    Ok(val[0])
}

/// Write a feature register
#[maybe_async]
pub async fn set_feature<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    addr: u8,
    value: u8,
) -> Result<()> {
    send_instruction(transport, swap, &[opcodes::SET_FEATURE, addr, value]).await
}

/// Block until the chip clears its busy bit
///
/// Polling and its timeout are handled by the target.
#[maybe_async]
pub async fn wait_for_busy<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
) -> Result<()> {
    let mut stream = CommandStream::new(swap.cmd_len as usize);
    stream.push(CommandGroup::WaitReady)?;
    transport.spi_run(&stream.finish()?).await
}
