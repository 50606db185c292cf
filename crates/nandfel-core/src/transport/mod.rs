//! Transport seam to the target's boot-ROM execution agent
//!
//! The engine never talks to the USB link directly. Everything it needs from
//! the target is expressed by [`FelTransport`]: run a command stream, move
//! bulk data in and out of target memory, and restart the target.

mod traits;

pub use traits::*;
