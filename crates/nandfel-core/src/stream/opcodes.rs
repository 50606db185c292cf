//! Command stream wire tags
//!
//! Each primitive understood by the target's SPI command interpreter starts
//! with one of these tag bytes. Multi-byte operands are little-endian 32-bit.

/// End of stream
pub const END: u8 = 0x00;
/// Assert chip select
pub const SELECT: u8 = 0x02;
/// Release chip select
pub const DESELECT: u8 = 0x03;
/// Transmit the next `n` inline bytes: `FAST, n, bytes...`
pub const FAST: u8 = 0x04;
/// Transmit from target memory: `TXBUF, addr(le32), len(le32)`
pub const TXBUF: u8 = 0x05;
/// Receive into target memory: `RXBUF, addr(le32), len(le32)`
pub const RXBUF: u8 = 0x06;
/// Poll the SPI-NAND status register until the busy bit clears
pub const SPINAND_WAIT: u8 = 0x08;

/// Encoded length of a tag with two 32-bit operands
pub const BUF_OP_LEN: usize = 9;
