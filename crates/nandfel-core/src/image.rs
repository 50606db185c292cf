//! Host-side image helpers
//!
//! A restore image is the data area of every page, back to back. Older
//! backups also carried each page's spare area; those are recognised by
//! their length and converted by dropping the spare bytes.

use alloc::vec::Vec;

use crate::chip::ChipDescriptor;
use crate::error::{Error, Result};

/// Spare area sizes tried when recognising old backups
pub const LEGACY_SPARE_SIZES: [u32; 3] = [64, 128, 256];

/// How an image file is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    /// Page data only
    Raw,
    /// Page data followed by `spare` bytes of spare area, per page
    WithSpare {
        /// Spare bytes per page
        spare: u32,
    },
}

/// Work out the layout of an image of `len` bytes for `chip`
pub fn detect_layout(chip: &ChipDescriptor, len: usize) -> Result<ImageLayout> {
    let expected = chip.image_size();
    if len as u64 == expected {
        return Ok(ImageLayout::Raw);
    }

    let pages = chip.total_pages() as u64;
    let candidates = core::iter::once(chip.spare_size).chain(LEGACY_SPARE_SIZES);
    for spare in candidates {
        if spare > 0 && len as u64 == pages * (chip.page_size + spare) as u64 {
            return Ok(ImageLayout::WithSpare { spare });
        }
    }

    Err(Error::ImageSizeMismatch {
        expected: expected as usize,
        actual: len,
    })
}

/// Drop the spare area of every page
///
/// A trailing partial record is ignored.
pub fn strip_spare(data: &[u8], page_size: usize, spare: usize) -> Vec<u8> {
    let record = page_size + spare;
    let mut out = Vec::with_capacity(data.len() / record * page_size);
    for chunk in data.chunks_exact(record) {
        out.extend_from_slice(&chunk[..page_size]);
    }
    out
}

/// Turn a file's contents into a restore image for `chip`
///
/// Raw images are returned unchanged; old backups with spare area are
/// converted.
pub fn prepare(chip: &ChipDescriptor, data: Vec<u8>) -> Result<Vec<u8>> {
    match detect_layout(chip, data.len())? {
        ImageLayout::Raw => Ok(data),
        ImageLayout::WithSpare { spare } => {
            log::info!("Old backup detected, spare area: {} bytes", spare);
            Ok(strip_spare(&data, chip.page_size as usize, spare as usize))
        }
    }
}
