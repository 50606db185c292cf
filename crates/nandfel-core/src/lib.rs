//! nandfel-core - SPI-NAND programming engine
//!
//! This crate drives raw SPI-NAND flash chips attached to a target whose
//! boot ROM exposes a small SPI command interpreter. The host never toggles
//! chip-select itself: it assembles command streams (select, deselect,
//! instruction bytes, busy-wait, bulk transfers to and from a scratch buffer
//! in target memory) and hands them to a [`transport::FelTransport`] that
//! executes each stream as a single round trip.
//!
//! On top of that primitive the crate provides chip identification,
//! feature-register access, and batched erase, dump and restore of a whole
//! device. Restore skips pages that are entirely `0xFF`.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation (required by the batch orchestrators)
//! - `is_sync` - Compile the `maybe_async` transport seam as blocking code
//!
//! # Example
//!
//! ```ignore
//! use nandfel_core::flash::{self, BatchConfig, NoProgress};
//!
//! fn backup<T: nandfel_core::transport::FelTransport>(t: &mut T) -> nandfel_core::Result<Vec<u8>> {
//!     let session = flash::init(t, false)?;
//!     println!("Found: {} ({} bytes)", session.chip.name, session.chip.capacity());
//!     let config = BatchConfig::default().fitted(&session)?;
//!     flash::dump(t, &session, &config, &mut NoProgress)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod error;
#[cfg(feature = "alloc")]
pub mod flash;
#[cfg(feature = "alloc")]
pub mod image;
#[cfg(feature = "alloc")]
pub mod protocol;
pub mod status;
#[cfg(feature = "alloc")]
pub mod stream;
pub mod transport;

pub use error::{Error, Result};
