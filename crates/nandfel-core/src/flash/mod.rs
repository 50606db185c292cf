//! High-level flash operations
//!
//! This module provides session setup and the whole-device erase, dump and
//! restore orchestrators.

mod config;
mod dump;
mod erase;
mod init;
mod progress;
mod restore;
mod session;

pub use config::*;
pub use dump::*;
pub use erase::*;
pub use init::*;
pub use progress::*;
pub use restore::*;
pub use session::*;
