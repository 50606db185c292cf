//! Whole-device page dump

use alloc::vec;
use alloc::vec::Vec;

use maybe_async::maybe_async;

use crate::error::{Error, Result};
use crate::stream::{CommandGroup, CommandStream};
use crate::transport::FelTransport;

use super::config::BatchConfig;
use super::progress::Progress;
use super::session::Session;

/// Read every page of the chip
///
/// Returns `total_pages * page_size` bytes. No unlock is needed.
#[maybe_async]
pub async fn dump<T: FelTransport + ?Sized, P: Progress + ?Sized>(
    transport: &mut T,
    session: &Session,
    config: &BatchConfig,
    progress: &mut P,
) -> Result<Vec<u8>> {
    config.validate_read(session)?;
    let mut out = vec![0u8; session.chip.image_size() as usize];
    dump_into(transport, session, config, &mut out, progress).await?;
    Ok(out)
}

/// Read every page of the chip into `buf`
///
/// `buf` must be exactly `total_pages * page_size` bytes long. Each stream
/// loads [`BatchConfig::read_pages`] pages into consecutive slots of the swap
/// buffer, then one bulk read copies them out; the last stream only covers
/// the remaining pages.
#[maybe_async]
pub async fn dump_into<T: FelTransport + ?Sized, P: Progress + ?Sized>(
    transport: &mut T,
    session: &Session,
    config: &BatchConfig,
    buf: &mut [u8],
    progress: &mut P,
) -> Result<()> {
    config.validate_read(session)?;

    let chip = session.chip;
    let expected = chip.image_size() as usize;
    if buf.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: buf.len(),
        });
    }

    let total_pages = chip.total_pages();
    let page_size = session.page_size();
    log::debug!(
        "Reading {} pages, {} per batch",
        total_pages,
        config.read_pages()
    );

    progress.start(expected as u64);
    let mut stream = CommandStream::new(session.cmd_len());
    let mut page = 0u32;
    while page < total_pages {
        let count = config.read_pages().min(total_pages - page);
        stream.clear();
        for slot in 0..count {
            stream.push(CommandGroup::ReadPage {
                page: page + slot,
                dest: session.swap_base() + slot * chip.page_size,
                len: chip.page_size,
            })?;
        }
        transport.spi_run(&stream.finish()?).await?;

        let offset = page as usize * page_size;
        let len = count as usize * page_size;
        transport
            .read(session.swap_base(), &mut buf[offset..offset + len])
            .await?;

        page += count;
        progress.advance(len as u64);
    }
    progress.finish();

    Ok(())
}
