//! Capacity-bounded command stream builder

use alloc::vec::Vec;

use super::command::{CommandGroup, Op};
use crate::error::{Error, Result};

/// A command stream under construction
///
/// The builder tracks the encoded length (end marker included) and refuses
/// any group that would push it past the session's command buffer length.
///
/// # Example
///
/// ```ignore
/// let mut stream = CommandStream::new(session.cmd_len);
/// stream.push(CommandGroup::EraseBlock { page: 0 })?;
/// stream.push(CommandGroup::EraseBlock { page: 64 })?;
/// transport.spi_run(&stream.finish())?;
/// ```
#[derive(Debug, Clone)]
pub struct CommandStream {
    groups: Vec<CommandGroup>,
    len: usize,
    capacity: usize,
}

impl CommandStream {
    /// Create an empty stream bounded by `capacity` encoded bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: Vec::new(),
            len: Op::End.encoded_len(),
            capacity,
        }
    }

    /// Append a group
    ///
    /// Fails with [`Error::BufferTooLarge`] if the stream would no longer
    /// fit, leaving the stream unchanged.
    pub fn push(&mut self, group: CommandGroup) -> Result<&mut Self> {
        let needed = self.len + group.encoded_len()?;
        if needed > self.capacity {
            return Err(Error::BufferTooLarge {
                needed,
                capacity: self.capacity,
            });
        }
        self.len = needed;
        self.groups.push(group);
        Ok(self)
    }

    /// Encoded length including the end marker
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no group has been pushed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Maximum encoded length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all groups, keeping the capacity
    pub fn clear(&mut self) {
        self.groups.clear();
        self.len = Op::End.encoded_len();
    }

    /// Encode the stream, end marker included
    pub fn finish(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.len);
        for group in &self.groups {
            for op in group.ops()? {
                op.encode(&mut out);
            }
        }
        Op::End.encode(&mut out);
        Ok(out)
    }
}

/// Encoded length of a stream of `units` copies of `group`, end marker
/// included
pub fn stream_len(group: &CommandGroup, units: usize) -> Result<usize> {
    Ok(group.encoded_len()? * units + Op::End.encoded_len())
}
