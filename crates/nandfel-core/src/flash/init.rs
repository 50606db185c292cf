//! Chip identification and initialization
//!
//! Initialization runs as an ordered list of named steps. The first failing
//! step stops the sequence and is logged by name.

use core::fmt;

use maybe_async::maybe_async;

use crate::error::{Error, Result};
use crate::protocol::{self, opcodes, ConfigFlags};
use crate::transport::{FelTransport, SwapInfo};

use super::session::Session;

/// One step of the initialization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Reset the chip and wait for it to become ready
    Reset,
    /// Clear the block protection register
    Unlock,
    /// Make sure on-chip ECC is enabled
    EnableEcc,
    /// Final busy-wait
    Settle,
}

impl InitStep {
    /// Steps run for a session, in order
    pub fn sequence(unlock: bool) -> &'static [InitStep] {
        if unlock {
            &[
                InitStep::Reset,
                InitStep::Unlock,
                InitStep::EnableEcc,
                InitStep::Settle,
            ]
        } else {
            &[InitStep::Reset, InitStep::EnableEcc, InitStep::Settle]
        }
    }
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStep::Reset => "reset",
            InitStep::Unlock => "unlock",
            InitStep::EnableEcc => "enable ECC",
            InitStep::Settle => "settle",
        };
        f.write_str(name)
    }
}

/// Open a session: identify the chip and bring it into a known state
///
/// With `unlock` the block protection register is cleared; erase and restore
/// need it, dump and status do not. ECC is always enabled. Running this on a
/// chip that is already unlocked and has ECC on only costs register reads.
#[maybe_async]
pub async fn init<T: FelTransport + ?Sized>(transport: &mut T, unlock: bool) -> Result<Session> {
    let swap = transport.spi_init().await?;
    log::debug!(
        "SPI ready: swap buffer 0x{:08x} ({} bytes), command buffer {} bytes",
        swap.swap_base,
        swap.swap_len,
        swap.cmd_len
    );

    let chip = protocol::identify(transport, &swap).await?;
    log::info!(
        "Found {} ({} MiB, {} byte pages)",
        chip.name,
        chip.capacity() / (1024 * 1024),
        chip.page_size
    );

    let session = Session::new(chip, swap);
    session.check_addressable()?;

    for &step in InitStep::sequence(unlock) {
        if let Err(e) = run_step(transport, &swap, step).await {
            log::error!("Initialization step '{}' failed: {}", step, e);
            return Err(e);
        }
    }

    Ok(session)
}

/// Identify the chip without touching its registers beyond a reset
///
/// Equivalent to [`init`] without unlocking.
#[maybe_async]
pub async fn detect<T: FelTransport + ?Sized>(transport: &mut T) -> Result<Session> {
    init(transport, false).await
}

#[maybe_async]
async fn run_step<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    step: InitStep,
) -> Result<()> {
    match step {
        InitStep::Reset => {
            protocol::reset(transport, swap).await?;
            protocol::wait_for_busy(transport, swap).await
        }
        InitStep::Unlock => unlock(transport, swap).await,
        InitStep::EnableEcc => enable_ecc(transport, swap).await,
        InitStep::Settle => protocol::wait_for_busy(transport, swap).await,
    }
}

#[maybe_async]
async fn read_register<T: FelTransport + ?Sized>(
    transport: &mut T,
    swap: &SwapInfo,
    addr: u8,
) -> Result<u8> {
    protocol::get_feature(transport, swap, addr)
        .await
        .map_err(|_| Error::StatusReadFailed)
}

#[maybe_async]
async fn unlock<T: FelTransport + ?Sized>(transport: &mut T, swap: &SwapInfo) -> Result<()> {
    let protect = read_register(transport, swap, opcodes::FEATURE_PROTECT).await?;
    if protect == 0 {
        return Ok(());
    }
    log::debug!("Clearing block protection (0x{:02x})", protect);

    protocol::wait_for_busy(transport, swap).await?;
    protocol::set_feature(transport, swap, opcodes::FEATURE_PROTECT, 0).await?;
    protocol::wait_for_busy(transport, swap).await?;

    let protect = read_register(transport, swap, opcodes::FEATURE_PROTECT).await?;
    if protect != 0 {
        return Err(Error::ProtectionClearFailed);
    }
    Ok(())
}

#[maybe_async]
async fn enable_ecc<T: FelTransport + ?Sized>(transport: &mut T, swap: &SwapInfo) -> Result<()> {
    // Reset or unlock may leave the chip busy
    protocol::wait_for_busy(transport, swap).await?;
    let config = read_register(transport, swap, opcodes::FEATURE_CONFIG).await?;
    if ConfigFlags::from_bits_retain(config).contains(ConfigFlags::ECC_EN) {
        return Ok(());
    }
    log::debug!("Enabling on-chip ECC (config 0x{:02x})", config);

    protocol::wait_for_busy(transport, swap).await?;
    let value = config | ConfigFlags::ECC_EN.bits();
    protocol::set_feature(transport, swap, opcodes::FEATURE_CONFIG, value).await?;
    protocol::wait_for_busy(transport, swap).await?;

    let config = read_register(transport, swap, opcodes::FEATURE_CONFIG).await?;
    if !ConfigFlags::from_bits_retain(config).contains(ConfigFlags::ECC_EN) {
        return Err(Error::EccEnableFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order() {
        assert_eq!(
            InitStep::sequence(true),
            &[
                InitStep::Reset,
                InitStep::Unlock,
                InitStep::EnableEcc,
                InitStep::Settle
            ]
        );
        assert!(!InitStep::sequence(false).contains(&InitStep::Unlock));
        assert_eq!(InitStep::sequence(false).last(), Some(&InitStep::Settle));
    }
}
