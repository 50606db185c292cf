//! Typed command stream primitives
//!
//! [`Op`] is one primitive of the interpreter's language. [`CommandGroup`] is
//! one of the fixed opcode groups the engine emits; groups are expanded to
//! ops and then to bytes only when a stream is finalized, so no caller ever
//! patches offsets into an encoded buffer.

use alloc::vec::Vec;

use super::opcodes;
use crate::error::{Error, Result};
use crate::protocol::opcodes as nand;

/// Maximum number of inline bytes carried by one [`Op::Fast`]
pub const MAX_FAST_LEN: usize = 8;

/// Maximum number of ops a single [`CommandGroup`] expands to
pub const MAX_GROUP_OPS: usize = 16;

/// Inline instruction bytes of a [`Op::Fast`]
pub type FastBytes = heapless::Vec<u8, MAX_FAST_LEN>;

/// Ops of one expanded [`CommandGroup`]
pub type GroupOps = heapless::Vec<Op, MAX_GROUP_OPS>;

/// One primitive of the command stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Assert chip select
    Select,
    /// Release chip select
    Deselect,
    /// Transmit inline bytes (instruction and address phase)
    Fast(FastBytes),
    /// Block until the chip reports ready
    Wait,
    /// Transmit `len` bytes from target memory at `addr`
    TxBuf {
        /// Source address in target memory
        addr: u32,
        /// Number of bytes
        len: u32,
    },
    /// Receive `len` bytes into target memory at `addr`
    RxBuf {
        /// Destination address in target memory
        addr: u32,
        /// Number of bytes
        len: u32,
    },
    /// End of stream
    End,
}

impl Op {
    /// Create an inline transmit op
    pub fn fast(bytes: &[u8]) -> Result<Self> {
        fast_bytes(bytes).map(Op::Fast)
    }

    /// Number of bytes this op occupies on the wire
    pub fn encoded_len(&self) -> usize {
        match self {
            Op::Select | Op::Deselect | Op::Wait | Op::End => 1,
            Op::Fast(bytes) => 2 + bytes.len(),
            Op::TxBuf { .. } | Op::RxBuf { .. } => opcodes::BUF_OP_LEN,
        }
    }

    /// Append the wire encoding of this op to `out`
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Op::Select => out.push(opcodes::SELECT),
            Op::Deselect => out.push(opcodes::DESELECT),
            Op::Wait => out.push(opcodes::SPINAND_WAIT),
            Op::End => out.push(opcodes::END),
            Op::Fast(bytes) => {
                out.push(opcodes::FAST);
                out.push(bytes.len() as u8);
                out.extend_from_slice(bytes);
            }
            Op::TxBuf { addr, len } => {
                out.push(opcodes::TXBUF);
                out.extend_from_slice(&addr.to_le_bytes());
                out.extend_from_slice(&len.to_le_bytes());
            }
            Op::RxBuf { addr, len } => {
                out.push(opcodes::RXBUF);
                out.extend_from_slice(&addr.to_le_bytes());
                out.extend_from_slice(&len.to_le_bytes());
            }
        }
    }
}

/// One fixed-shape opcode group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandGroup {
    /// Select, transmit the instruction bytes, deselect
    Instruction(FastBytes),
    /// Select, wait for ready, deselect
    WaitReady,
    /// Write enable, block erase addressed by the block's first page, wait
    EraseBlock {
        /// Index of the first page of the block
        page: u32,
    },
    /// Load a page to the chip cache, wait, then read the cache into target
    /// memory
    ReadPage {
        /// Page index
        page: u32,
        /// Destination address in target memory
        dest: u32,
        /// Number of bytes to read from the cache
        len: u32,
    },
    /// Write enable, load target memory into the chip cache, program the
    /// page, wait
    ProgramPage {
        /// Page index
        page: u32,
        /// Source address in target memory
        src: u32,
        /// Number of bytes to load
        len: u32,
    },
    /// One chip-select transaction moving staged bytes out and reply bytes
    /// in through the same target buffer. Zero lengths omit the phase.
    Transfer {
        /// Target buffer address
        addr: u32,
        /// Bytes to transmit from `addr`
        tx_len: u32,
        /// Bytes to receive into `addr`
        rx_len: u32,
    },
}

impl CommandGroup {
    /// Create an instruction group from raw instruction bytes
    pub fn instruction(bytes: &[u8]) -> Result<Self> {
        fast_bytes(bytes).map(CommandGroup::Instruction)
    }

    /// Expand the group into its primitive ops
    pub fn ops(&self) -> Result<GroupOps> {
        let ops = match self {
            CommandGroup::Instruction(bytes) => {
                seq([Op::Select, Op::Fast(bytes.clone()), Op::Deselect])
            }
            CommandGroup::WaitReady => seq([Op::Select, Op::Wait, Op::Deselect]),
            CommandGroup::EraseBlock { page } => {
                let [r2, r1, r0] = row(*page)?;
                seq([
                    Op::Select,
                    Op::fast(&[nand::WREN])?,
                    Op::Deselect,
                    Op::Select,
                    Op::fast(&[nand::BLOCK_ERASE, r2, r1, r0])?,
                    Op::Deselect,
                    Op::Select,
                    Op::Wait,
                    Op::Deselect,
                ])
            }
            CommandGroup::ReadPage { page, dest, len } => {
                let [r2, r1, r0] = row(*page)?;
                seq([
                    Op::Select,
                    Op::fast(&[nand::PAGE_TO_CACHE, r2, r1, r0])?,
                    Op::Deselect,
                    Op::Select,
                    Op::Wait,
                    Op::Deselect,
                    Op::Select,
                    Op::fast(&[nand::READ_FROM_CACHE, 0x00, 0x00, 0x00])?,
                    Op::RxBuf {
                        addr: *dest,
                        len: *len,
                    },
                    Op::Deselect,
                ])
            }
            CommandGroup::ProgramPage { page, src, len } => {
                let [r2, r1, r0] = row(*page)?;
                seq([
                    Op::Select,
                    Op::fast(&[nand::WREN])?,
                    Op::Deselect,
                    Op::Select,
                    Op::fast(&[nand::PROGRAM_LOAD, 0x00, 0x00])?,
                    Op::TxBuf {
                        addr: *src,
                        len: *len,
                    },
                    Op::Deselect,
                    Op::Select,
                    Op::fast(&[nand::PROGRAM_EXEC, r2, r1, r0])?,
                    Op::Deselect,
                    Op::Select,
                    Op::Wait,
                    Op::Deselect,
                ])
            }
            CommandGroup::Transfer {
                addr,
                tx_len,
                rx_len,
            } => {
                let mut ops = seq([Op::Select]);
                if *tx_len > 0 {
                    let _ = ops.push(Op::TxBuf {
                        addr: *addr,
                        len: *tx_len,
                    });
                }
                if *rx_len > 0 {
                    let _ = ops.push(Op::RxBuf {
                        addr: *addr,
                        len: *rx_len,
                    });
                }
                let _ = ops.push(Op::Deselect);
                ops
            }
        };
        Ok(ops)
    }

    /// Number of bytes this group occupies on the wire
    pub fn encoded_len(&self) -> Result<usize> {
        Ok(self.ops()?.iter().map(Op::encoded_len).sum())
    }
}

/// Wire length of one erase unit
pub const ERASE_UNIT_LEN: usize = 16;
/// Wire length of one page read unit
pub const READ_UNIT_LEN: usize = 28;
/// Wire length of one page program unit
pub const PROGRAM_UNIT_LEN: usize = 32;

fn fast_bytes(bytes: &[u8]) -> Result<FastBytes> {
    FastBytes::from_slice(bytes).map_err(|_| Error::BufferTooLarge {
        needed: bytes.len(),
        capacity: MAX_FAST_LEN,
    })
}

fn seq<const N: usize>(ops: [Op; N]) -> GroupOps {
    let mut out = GroupOps::new();
    for op in ops {
        // No group shape exceeds MAX_GROUP_OPS
        let _ = out.push(op);
    }
    out
}

/// 3-byte big-endian row address
fn row(page: u32) -> Result<[u8; 3]> {
    if page > nand::MAX_ROW {
        return Err(Error::AddressOutOfRange { page });
    }
    let [_, r2, r1, r0] = page.to_be_bytes();
    Ok([r2, r1, r0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encode(group: &CommandGroup) -> Vec<u8> {
        let mut out = Vec::new();
        for op in group.ops().unwrap() {
            op.encode(&mut out);
        }
        out
    }

    #[test]
    fn test_erase_unit_layout() {
        let bytes = encode(&CommandGroup::EraseBlock { page: 0x1240 });
        assert_eq!(
            bytes,
            vec![
                0x02, 0x04, 0x01, 0x06, 0x03, // WREN
                0x02, 0x04, 0x04, 0xD8, 0x00, 0x12, 0x40, 0x03, // erase
                0x02, 0x08, 0x03, // wait
            ]
        );
        assert_eq!(bytes.len(), ERASE_UNIT_LEN);
    }

    #[test]
    fn test_read_unit_layout() {
        let group = CommandGroup::ReadPage {
            page: 0x0102,
            dest: 0x0004_0800,
            len: 2048,
        };
        let bytes = encode(&group);
        assert_eq!(
            bytes,
            vec![
                0x02, 0x04, 0x04, 0x13, 0x00, 0x01, 0x02, 0x03, // to cache
                0x02, 0x08, 0x03, // wait
                0x02, 0x04, 0x04, 0x03, 0x00, 0x00, 0x00, // read cache
                0x06, 0x00, 0x08, 0x04, 0x00, 0x00, 0x08, 0x00, 0x00, // rxbuf
                0x03,
            ]
        );
        assert_eq!(bytes.len(), READ_UNIT_LEN);
        assert_eq!(group.encoded_len().unwrap(), READ_UNIT_LEN);
    }

    #[test]
    fn test_program_unit_layout() {
        let group = CommandGroup::ProgramPage {
            page: 7,
            src: 0x0002_0000,
            len: 4096,
        };
        let bytes = encode(&group);
        assert_eq!(
            bytes,
            vec![
                0x02, 0x04, 0x01, 0x06, 0x03, // WREN
                0x02, 0x04, 0x03, 0x02, 0x00, 0x00, // program load
                0x05, 0x00, 0x00, 0x02, 0x00, 0x00, 0x10, 0x00, 0x00, // txbuf
                0x03, //
                0x02, 0x04, 0x04, 0x10, 0x00, 0x00, 0x07, 0x03, // execute
                0x02, 0x08, 0x03, // wait
            ]
        );
        assert_eq!(bytes.len(), PROGRAM_UNIT_LEN);
    }

    #[test]
    fn test_wait_group() {
        assert_eq!(encode(&CommandGroup::WaitReady), vec![0x02, 0x08, 0x03]);
    }

    #[test]
    fn test_instruction_group() {
        let group = CommandGroup::instruction(&[0x1F, 0xA0, 0x00]).unwrap();
        assert_eq!(
            encode(&group),
            vec![0x02, 0x04, 0x03, 0x1F, 0xA0, 0x00, 0x03]
        );
        assert!(matches!(
            CommandGroup::instruction(&[0u8; 9]),
            Err(Error::BufferTooLarge {
                needed: 9,
                capacity: MAX_FAST_LEN
            })
        ));
    }

    #[test]
    fn test_transfer_group() {
        let group = CommandGroup::Transfer {
            addr: 0x8000,
            tx_len: 2,
            rx_len: 4,
        };
        assert_eq!(
            encode(&group),
            vec![
                0x02, //
                0x05, 0x00, 0x80, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, //
                0x06, 0x00, 0x80, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, //
                0x03,
            ]
        );

        // Transmit only
        let group = CommandGroup::Transfer {
            addr: 0x8000,
            tx_len: 1,
            rx_len: 0,
        };
        assert_eq!(group.encoded_len().unwrap(), 11);
    }

    #[test]
    fn test_row_address_range() {
        assert_eq!(row(0x00AB_CDEF).unwrap(), [0xAB, 0xCD, 0xEF]);
        assert_eq!(
            CommandGroup::EraseBlock { page: 0x0100_0000 }.ops(),
            Err(Error::AddressOutOfRange { page: 0x0100_0000 })
        );
    }
}
