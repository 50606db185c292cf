//! Whole-device block erase

use maybe_async::maybe_async;

use crate::error::Result;
use crate::stream::{CommandGroup, CommandStream};
use crate::transport::FelTransport;

use super::config::BatchConfig;
use super::progress::Progress;
use super::session::Session;

/// Erase every block of the chip
///
/// The session must have been opened with unlock. Blocks are addressed by
/// their first page and packed [`BatchConfig::erase_blocks`] to a stream;
/// the last stream only carries the remaining blocks. Progress advances by
/// `pages_per_block * page_size` per block.
///
/// A failed stream aborts the run. There is no resume; start over from
/// [`init`](super::init).
#[maybe_async]
pub async fn erase<T: FelTransport + ?Sized, P: Progress + ?Sized>(
    transport: &mut T,
    session: &Session,
    config: &BatchConfig,
    progress: &mut P,
) -> Result<()> {
    config.validate_erase(session)?;

    let chip = session.chip;
    let total_blocks = chip.total_blocks();
    let block_bytes = chip.block_size() as u64;
    log::debug!(
        "Erasing {} blocks, {} per batch",
        total_blocks,
        config.erase_blocks()
    );

    progress.start(total_blocks as u64 * block_bytes);
    let mut stream = CommandStream::new(session.cmd_len());
    let mut block = 0u32;
    while block < total_blocks {
        let count = config.erase_blocks().min(total_blocks - block);
        stream.clear();
        for i in 0..count {
            stream.push(CommandGroup::EraseBlock {
                page: (block + i) * chip.pages_per_block,
            })?;
        }
        transport.spi_run(&stream.finish()?).await?;

        block += count;
        progress.advance(count as u64 * block_bytes);
    }
    progress.finish();

    Ok(())
}
