//! Command streams for the target's SPI command interpreter
//!
//! A command stream is an ordered list of primitives (select, deselect,
//! inline transmit, busy-wait, bulk transmit/receive through target memory)
//! terminated by an end marker and executed by the target in one round trip.
//! Streams are assembled from typed [`CommandGroup`]s and only encoded to
//! bytes by [`CommandStream::finish`].

mod builder;
mod command;
pub mod opcodes;

pub use builder::*;
pub use command::*;
