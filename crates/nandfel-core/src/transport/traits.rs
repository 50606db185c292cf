//! Transport trait definitions
//!
//! These traits use `maybe_async` to support both sync and async modes.
//! - By default, traits are async
//! - With the `is_sync` feature, traits become synchronous

use crate::error::Result;
use maybe_async::maybe_async;

/// Target memory made available to the SPI command interpreter
///
/// Returned by [`FelTransport::spi_init`]. All bulk transfers of a session go
/// through the swap region; command streams are limited to `cmd_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapInfo {
    /// Base address of the scratch ("swap") buffer in target memory
    pub swap_base: u32,
    /// Length of the scratch buffer in bytes
    pub swap_len: u32,
    /// Maximum length of one encoded command stream in bytes
    pub cmd_len: u32,
}

/// Boot-ROM execution agent (sync or async depending on `is_sync` feature)
///
/// Implementations map every failure of their underlying link onto
/// [`Error::TransportFailure`](crate::error::Error::TransportFailure).
/// Calls are strictly sequential; there is never more than one command
/// stream in flight.
#[maybe_async(AFIT)]
pub trait FelTransport {
    /// Prepare the target's SPI controller and report its buffers
    async fn spi_init(&mut self) -> Result<SwapInfo>;

    /// Execute one encoded command stream
    ///
    /// The stream must be terminated by the end marker and must not be
    /// longer than [`SwapInfo::cmd_len`].
    async fn spi_run(&mut self, stream: &[u8]) -> Result<()>;

    /// Bulk read `buf.len()` bytes of target memory starting at `addr`
    async fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Bulk write `data` into target memory starting at `addr`
    async fn write(&mut self, addr: u32, data: &[u8]) -> Result<()>;

    /// Restart the target
    async fn reset(&mut self) -> Result<()>;

    /// Delay for the specified number of microseconds
    async fn delay_us(&mut self, us: u32);
}

// Blanket impl for boxed transports to allow trait objects (sync mode only)
// In async mode, traits with async fn are not object-safe
#[cfg(all(feature = "alloc", feature = "is_sync"))]
impl FelTransport for alloc::boxed::Box<dyn FelTransport + Send> {
    fn spi_init(&mut self) -> Result<SwapInfo> {
        (**self).spi_init()
    }

    fn spi_run(&mut self, stream: &[u8]) -> Result<()> {
        (**self).spi_run(stream)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read(addr, buf)
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        (**self).write(addr, data)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Information about a transport implementation
#[derive(Debug, Clone)]
pub struct TransportInfo {
    /// Name of the transport
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description
    pub description: &'static str,
}
