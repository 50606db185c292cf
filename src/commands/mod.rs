//! CLI command implementations
//!
//! Every command that touches the chip opens its own session through
//! [`nandfel_core::flash::init`]; read-only commands never clear the block
//! protection.

mod checksum;
mod detect;
mod erase;
mod list;
mod progress;
mod read;
mod write;

pub use detect::{run_detect, run_reset, run_status};
pub use erase::run_erase;
pub use list::{list_chips, list_programmers};
pub use progress::IndicatifProgress;
pub use read::run_read;
pub use write::run_write;

fn mib(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}
