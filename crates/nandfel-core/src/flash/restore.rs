//! Whole-device restore with sparse writes
//!
//! A page whose bytes are all `0xFF` reads back the same as an erased page,
//! so after a full erase it never needs programming. [`SparseScanner`] walks
//! an image and packs only the remaining pages into program batches, each
//! keeping its true device page index.

use alloc::vec::Vec;

use maybe_async::maybe_async;

use crate::error::{Error, Result};
use crate::stream::{CommandGroup, CommandStream};
use crate::transport::FelTransport;

use super::config::BatchConfig;
use super::erase::erase;
use super::init::init;
use super::progress::Progress;
use super::session::Session;

/// Erased byte value
pub const ERASED: u8 = 0xFF;

/// Returns true if a page holds only erased bytes
pub fn is_empty_page(page: &[u8]) -> bool {
    page.iter().all(|&b| b == ERASED)
}

/// One page to program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparsePage<'a> {
    /// Device page index
    pub page: u32,
    /// Page contents
    pub data: &'a [u8],
}

/// Pages to program in one command stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseBatch<'a> {
    /// Non-empty pages, in increasing page order
    pub pages: Vec<SparsePage<'a>>,
    /// Device pages walked since the previous batch, empty ones included
    pub advanced: u32,
}

impl SparseBatch<'_> {
    /// Page contents laid out back to back, as staged in the swap buffer
    pub fn staged(&self) -> Vec<u8> {
        let len = self.pages.iter().map(|p| p.data.len()).sum();
        let mut out = Vec::with_capacity(len);
        for page in &self.pages {
            out.extend_from_slice(page.data);
        }
        out
    }
}

/// Splits an image into batches of non-empty pages
///
/// A batch closes once it holds `batch_pages` pages or the image ends. Empty
/// pages are skipped but still counted in [`SparseBatch::advanced`]; a batch
/// may therefore carry no pages at all when the image ends in empty pages.
#[derive(Debug, Clone)]
pub struct SparseScanner<'a> {
    data: &'a [u8],
    page_size: usize,
    batch_pages: usize,
    next: u32,
    total: u32,
}

impl<'a> SparseScanner<'a> {
    /// Scan `data` in pages of `page_size` bytes
    ///
    /// A trailing partial page is ignored.
    pub fn new(data: &'a [u8], page_size: usize, batch_pages: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            data,
            page_size,
            batch_pages: batch_pages.max(1),
            next: 0,
            total: (data.len() / page_size) as u32,
        }
    }

    fn page(&self, index: u32) -> &'a [u8] {
        let start = index as usize * self.page_size;
        &self.data[start..start + self.page_size]
    }
}

impl<'a> Iterator for SparseScanner<'a> {
    type Item = SparseBatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }

        let start = self.next;
        let mut pages = Vec::new();
        while self.next < self.total && pages.len() < self.batch_pages {
            let data = self.page(self.next);
            if !is_empty_page(data) {
                pages.push(SparsePage {
                    page: self.next,
                    data,
                });
            }
            self.next += 1;
        }

        Some(SparseBatch {
            pages,
            advanced: self.next - start,
        })
    }
}

/// Program an image onto an erased chip
///
/// `data` must be exactly `total_pages * page_size` bytes. Only non-empty
/// pages are staged and programmed; progress still advances over the empty
/// ones. A batch without pages does no I/O.
#[maybe_async]
pub async fn restore<T: FelTransport + ?Sized, P: Progress + ?Sized>(
    transport: &mut T,
    session: &Session,
    config: &BatchConfig,
    data: &[u8],
    progress: &mut P,
) -> Result<()> {
    config.validate_program(session)?;

    let chip = session.chip;
    let expected = chip.image_size() as usize;
    if data.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let page_size = session.page_size();
    progress.start(expected as u64);
    let mut stream = CommandStream::new(session.cmd_len());
    let mut written = 0usize;
    for batch in SparseScanner::new(data, page_size, config.program_pages() as usize) {
        if !batch.pages.is_empty() {
            transport.write(session.swap_base(), &batch.staged()).await?;

            stream.clear();
            for (slot, page) in batch.pages.iter().enumerate() {
                stream.push(CommandGroup::ProgramPage {
                    page: page.page,
                    src: session.swap_base() + slot as u32 * chip.page_size,
                    len: chip.page_size,
                })?;
            }
            transport.spi_run(&stream.finish()?).await?;
            written += batch.pages.len();
        }
        progress.advance(batch.advanced as u64 * page_size as u64);
    }
    progress.finish();

    log::debug!(
        "Programmed {} of {} pages",
        written,
        chip.total_pages()
    );
    Ok(())
}

/// Full write flow: erase the chip, then restore `data` onto it
///
/// Opens its own sessions (with unlock) before the erase and again before
/// the restore. The image size and batch sizes are checked before anything
/// is erased. `progress` sees the erase run followed by the restore run.
#[maybe_async]
pub async fn write_image<T: FelTransport + ?Sized, P: Progress + ?Sized>(
    transport: &mut T,
    config: &BatchConfig,
    data: &[u8],
    progress: &mut P,
) -> Result<Session> {
    let session = init(transport, true).await?;
    let expected = session.chip.image_size() as usize;
    if data.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    config.validate_erase(&session)?;
    config.validate_program(&session)?;

    erase(transport, &session, config, progress).await?;

    let session = init(transport, true).await?;
    restore(transport, &session, config, data, progress).await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const PAGE: usize = 4;

    fn image(pages: &[u8]) -> Vec<u8> {
        // 0xFF marks an empty page, anything else fills a data page
        let mut out = Vec::new();
        for &fill in pages {
            out.extend_from_slice(&[fill; PAGE]);
        }
        out
    }

    fn indices(batch: &SparseBatch<'_>) -> Vec<u32> {
        batch.pages.iter().map(|p| p.page).collect()
    }

    #[test]
    fn test_is_empty_page() {
        assert!(is_empty_page(&[0xFF; 16]));
        assert!(!is_empty_page(&[0xFF, 0xFF, 0xFE, 0xFF]));
        assert!(is_empty_page(&[]));
    }

    #[test]
    fn test_skips_empty_pages() {
        let data = image(&[0x00, 0xFF, 0x11, 0xFF, 0xFF, 0x22]);
        let batches: Vec<_> = SparseScanner::new(&data, PAGE, 8).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(indices(&batches[0]), vec![0, 2, 5]);
        assert_eq!(batches[0].advanced, 6);
        assert_eq!(batches[0].staged(), image(&[0x00, 0x11, 0x22]));
    }

    #[test]
    fn test_batches_close_when_full() {
        let data = image(&[0x01, 0xFF, 0x02, 0x03, 0xFF, 0xFF, 0x04, 0x05]);
        let batches: Vec<_> = SparseScanner::new(&data, PAGE, 2).collect();
        assert_eq!(indices(&batches[0]), vec![0, 2]);
        assert_eq!(batches[0].advanced, 3);
        assert_eq!(indices(&batches[1]), vec![3, 6]);
        assert_eq!(batches[1].advanced, 4);
        assert_eq!(indices(&batches[2]), vec![7]);
        assert_eq!(batches[2].advanced, 1);
    }

    #[test]
    fn test_empty_tail_batch() {
        let data = image(&[0x01, 0x02, 0xFF, 0xFF]);
        let batches: Vec<_> = SparseScanner::new(&data, PAGE, 2).collect();
        assert_eq!(batches.len(), 2);
        assert!(batches[1].pages.is_empty());
        assert_eq!(batches[1].advanced, 2);
    }

    #[test]
    fn test_all_empty_image() {
        let data = vec![0xFF; PAGE * 10];
        let batches: Vec<_> = SparseScanner::new(&data, PAGE, 3).collect();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].pages.is_empty());
        assert_eq!(batches[0].advanced, 10);
    }

    #[test]
    fn test_advanced_sums_to_page_count() {
        let data = image(&[0x01, 0xFF, 0x02, 0xFF, 0x03, 0x04, 0xFF, 0x05, 0xFF]);
        let total: u32 = SparseScanner::new(&data, PAGE, 2).map(|b| b.advanced).sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn test_pages_strictly_increasing_and_unique() {
        let data = image(&[0x01, 0x02, 0xFF, 0x03, 0x04, 0x05, 0xFF, 0x06]);
        let all: Vec<u32> = SparseScanner::new(&data, PAGE, 3)
            .flat_map(|b| b.pages.into_iter().map(|p| p.page))
            .collect();
        assert_eq!(all, vec![0, 1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_page_data_matches_source() {
        let mut data = vec![0xFF; PAGE * 4];
        data[PAGE * 2 + 1] = 0x5A;
        let batches: Vec<_> = SparseScanner::new(&data, PAGE, 4).collect();
        let page = batches[0].pages[0];
        assert_eq!(page.page, 2);
        assert_eq!(page.data, &data[PAGE * 2..PAGE * 3]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(SparseScanner::new(&[], PAGE, 4).count(), 0);
    }
}
