//! nandfel-dummy - Emulated boot-ROM target for testing
//!
//! This crate provides a [`FelTransport`] that runs entirely in memory: it
//! interprets command streams the way the target's SPI command interpreter
//! does and drives an emulated SPI-NAND chip behind it. It's useful for
//! testing and development without real hardware.
//!
//! Every call is recorded in an event log, and a few faults can be injected
//! to exercise error paths.

mod nand;

use nandfel_core::chip::ChipDescriptor;
use nandfel_core::error::{Error, Result};
use nandfel_core::status::FeatureRegisters;
use nandfel_core::stream::opcodes;
use nandfel_core::transport::{FelTransport, SwapInfo};

use nand::NandChip;
pub use nand::{BP_MASK, LOCKED};

/// How the emulated chip answers the read-ID instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdMode {
    /// ID follows one address byte after the opcode (most SPI-NAND parts)
    #[default]
    AddressByte,
    /// ID follows the opcode directly
    Legacy,
}

/// Faults to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Faults {
    /// Writes to the protection register are ignored
    pub stuck_protect: bool,
    /// The ECC enable bit can't be set
    pub stuck_ecc: bool,
    /// Command streams fail once this many have run
    pub fail_after_runs: Option<usize>,
}

/// Configuration for the dummy target
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Emulated chip geometry
    pub chip: &'static ChipDescriptor,
    /// Raw read-ID response
    pub id: [u8; 4],
    /// Read-ID behaviour
    pub id_mode: IdMode,
    /// Power-on feature register values
    pub registers: FeatureRegisters,
    /// Target buffers reported by `spi_init`
    pub swap: SwapInfo,
    /// Injected faults
    pub faults: Faults,
}

impl DummyConfig {
    /// Unlocked chip with ECC disabled, answering with its registry ID
    pub fn new(chip: &'static ChipDescriptor) -> Self {
        let mut id = [0u8; 4];
        id[..chip.id.len()].copy_from_slice(chip.id.as_bytes());
        Self {
            chip,
            id,
            id_mode: IdMode::default(),
            registers: FeatureRegisters::default(),
            swap: SwapInfo {
                swap_base: 0x0002_0000,
                swap_len: 128 * chip.page_size,
                cmd_len: 4096 + 1,
            },
            faults: Faults::default(),
        }
    }

    /// Start with all blocks protected
    pub fn locked(mut self) -> Self {
        self.registers.protect = LOCKED;
        self
    }
}

/// One recorded call or chip-level effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `spi_init` was called
    SpiInit,
    /// A command stream of `len` bytes was run
    Run {
        /// Stream length in bytes
        len: usize,
    },
    /// Bulk read from target memory
    Read {
        /// Start address
        addr: u32,
        /// Length in bytes
        len: usize,
    },
    /// Bulk write to target memory
    Write {
        /// Start address
        addr: u32,
        /// Length in bytes
        len: usize,
    },
    /// The target was restarted
    TargetReset,
    /// The chip received RESET
    ChipReset,
    /// A feature register write reached the chip
    SetFeature {
        /// Register address
        addr: u8,
        /// Value written
        value: u8,
    },
    /// A block erase was executed
    BlockErase {
        /// Row address sent with the erase
        page: u32,
    },
    /// A page was loaded into the chip cache
    PageRead {
        /// Page index
        page: u32,
    },
    /// A page program was executed
    ProgramExec {
        /// Page index
        page: u32,
        /// Cache contents programmed
        data: Vec<u8>,
    },
}

/// In-memory boot-ROM target with an emulated SPI-NAND chip
pub struct DummyFel {
    swap: SwapInfo,
    memory: Vec<u8>,
    nand: NandChip,
    faults: Faults,
    runs: usize,
    delayed_us: u64,
    disconnected: bool,
    events: Vec<Event>,
}

impl DummyFel {
    /// Create a dummy target with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            swap: config.swap,
            memory: vec![0u8; config.swap.swap_len as usize],
            nand: NandChip::new(
                config.chip,
                config.id,
                config.id_mode,
                config.registers,
                config.faults,
            ),
            faults: config.faults,
            runs: 0,
            delayed_us: 0,
            disconnected: false,
            events: Vec::new(),
        }
    }

    /// Create a dummy target whose chip already holds `image`
    ///
    /// The image is page data back to back; a trailing partial page is
    /// ignored.
    pub fn with_image(config: DummyConfig, image: &[u8]) -> Self {
        let page_size = config.chip.page_size as usize;
        let mut dummy = Self::new(config);
        for (page, data) in image.chunks_exact(page_size).enumerate() {
            dummy.nand.store(page as u32, data);
        }
        dummy
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Pages passed to program execute, in order
    pub fn programmed(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ProgramExec { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    /// Row addresses passed to block erase, in order
    pub fn erased(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::BlockErase { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    /// Number of command streams run so far
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Total time passed to `delay_us`
    pub fn delayed_us(&self) -> u64 {
        self.delayed_us
    }

    /// Current feature register values
    pub fn registers(&self) -> FeatureRegisters {
        self.nand.registers()
    }

    /// Contents of one page
    pub fn page(&self, page: u32) -> Vec<u8> {
        self.nand.page(page)
    }

    /// Indices of pages that are not erased
    pub fn written_pages(&self) -> Vec<u32> {
        self.nand.programmed_pages().collect()
    }

    /// Contents of the whole chip, `total_pages * page_size` bytes
    pub fn contents(&self, chip: &ChipDescriptor) -> Vec<u8> {
        let mut out = Vec::with_capacity(chip.image_size() as usize);
        for page in 0..chip.total_pages() {
            out.extend_from_slice(&self.nand.page(page));
        }
        out
    }

    /// Make every further call fail, as if the USB link went away
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    fn check_link(&self) -> Result<()> {
        if self.disconnected {
            return Err(Error::TransportFailure);
        }
        Ok(())
    }

    fn memory_range(&self, addr: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = addr
            .checked_sub(self.swap.swap_base)
            .ok_or(Error::TransportFailure)? as usize;
        let end = start + len;
        if end > self.memory.len() {
            log::warn!(
                "dummy: access 0x{:08x}+{} outside the swap buffer",
                addr,
                len
            );
            return Err(Error::TransportFailure);
        }
        Ok(start..end)
    }

    /// Interpret one command stream
    fn interpret(&mut self, stream: &[u8]) -> Result<()> {
        if stream.len() > self.swap.cmd_len as usize {
            log::warn!(
                "dummy: stream of {} bytes exceeds command buffer ({})",
                stream.len(),
                self.swap.cmd_len
            );
            return Err(Error::TransportFailure);
        }

        let mut cursor = Cursor::new(stream);
        // Bytes shifted out since chip select, None while deselected
        let mut mosi: Option<Vec<u8>> = None;
        loop {
            match cursor.byte()? {
                opcodes::END => return Ok(()),
                opcodes::SELECT => mosi = Some(Vec::new()),
                opcodes::DESELECT => {
                    let bytes = mosi.take().ok_or(Error::TransportFailure)?;
                    self.nand.deselect(&bytes, &mut self.events)?;
                }
                opcodes::FAST => {
                    let n = cursor.byte()? as usize;
                    let bytes = cursor.take(n)?;
                    selected(&mut mosi)?.extend_from_slice(bytes);
                }
                opcodes::TXBUF => {
                    let (addr, len) = (cursor.le32()?, cursor.le32()? as usize);
                    let range = self.memory_range(addr, len)?;
                    selected(&mut mosi)?.extend_from_slice(&self.memory[range]);
                }
                opcodes::RXBUF => {
                    let (addr, len) = (cursor.le32()?, cursor.le32()? as usize);
                    let range = self.memory_range(addr, len)?;
                    let reply = self.nand.miso(selected(&mut mosi)?, len);
                    self.memory[range].copy_from_slice(&reply);
                }
                // The emulated chip is never busy
                opcodes::SPINAND_WAIT => {
                    selected(&mut mosi)?;
                }
                tag => {
                    log::warn!("dummy: unknown stream tag 0x{:02x}", tag);
                    return Err(Error::TransportFailure);
                }
            }
        }
    }
}

fn selected(mosi: &mut Option<Vec<u8>>) -> Result<&mut Vec<u8>> {
    mosi.as_mut().ok_or(Error::TransportFailure)
}

/// Reader over an encoded stream; running off the end is a failure
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let out = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or(Error::TransportFailure)?;
        self.pos += n;
        Ok(out)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn le32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl FelTransport for DummyFel {
    fn spi_init(&mut self) -> Result<SwapInfo> {
        self.check_link()?;
        self.events.push(Event::SpiInit);
        Ok(self.swap)
    }

    fn spi_run(&mut self, stream: &[u8]) -> Result<()> {
        self.check_link()?;
        if let Some(limit) = self.faults.fail_after_runs {
            if self.runs >= limit {
                return Err(Error::TransportFailure);
            }
        }
        self.runs += 1;
        self.events.push(Event::Run { len: stream.len() });
        self.interpret(stream)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.check_link()?;
        let range = self.memory_range(addr, buf.len())?;
        buf.copy_from_slice(&self.memory[range]);
        self.events.push(Event::Read {
            addr,
            len: buf.len(),
        });
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.check_link()?;
        let range = self.memory_range(addr, data.len())?;
        self.memory[range].copy_from_slice(data);
        self.events.push(Event::Write {
            addr,
            len: data.len(),
        });
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.check_link()?;
        self.events.push(Event::TargetReset);
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        self.delayed_us += us as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nandfel_core::chip;
    use nandfel_core::protocol::{self, opcodes as nand_ops};

    fn w25n01gv() -> DummyFel {
        DummyFel::new(DummyConfig::new(chip::find_by_name("W25N01GV").unwrap()))
    }

    #[test]
    fn test_read_id_with_address_byte() {
        let mut fel = w25n01gv();
        let swap = fel.spi_init().unwrap();
        let id = protocol::read_id(&mut fel, &swap, true).unwrap();
        assert_eq!(id, [0xEF, 0xAA, 0x21, 0x00]);
        // Without the address byte the dummy cycle comes first
        let id = protocol::read_id(&mut fel, &swap, false).unwrap();
        assert_eq!(id, [0x00, 0xEF, 0xAA, 0x21]);
    }

    #[test]
    fn test_legacy_read_id() {
        let mut config = DummyConfig::new(chip::find_by_name("GD5F1GQ4UExIG").unwrap());
        config.id = [0xC8, 0xD1, 0x7F, 0x7F];
        config.id_mode = IdMode::Legacy;
        let mut fel = DummyFel::new(config);
        let swap = fel.spi_init().unwrap();
        assert_eq!(
            protocol::read_id(&mut fel, &swap, true).unwrap(),
            [0xD1, 0x7F, 0x7F, 0x00]
        );
        assert_eq!(
            protocol::read_id(&mut fel, &swap, false).unwrap(),
            [0xC8, 0xD1, 0x7F, 0x7F]
        );
    }

    #[test]
    fn test_feature_registers() {
        let mut fel = w25n01gv();
        let swap = fel.spi_init().unwrap();
        protocol::set_feature(&mut fel, &swap, nand_ops::FEATURE_CONFIG, 0x18).unwrap();
        assert_eq!(
            protocol::get_feature(&mut fel, &swap, nand_ops::FEATURE_CONFIG).unwrap(),
            0x18
        );
        assert_eq!(fel.registers().config, 0x18);
        assert!(fel.events().contains(&Event::SetFeature {
            addr: 0xB0,
            value: 0x18
        }));
    }

    #[test]
    fn test_stuck_ecc() {
        let mut config = DummyConfig::new(chip::find_by_name("W25N01GV").unwrap());
        config.faults.stuck_ecc = true;
        let mut fel = DummyFel::new(config);
        let swap = fel.spi_init().unwrap();
        protocol::set_feature(&mut fel, &swap, nand_ops::FEATURE_CONFIG, 0x18).unwrap();
        assert_eq!(fel.registers().config, 0x08);
    }

    #[test]
    fn test_rejects_unterminated_stream() {
        let mut fel = w25n01gv();
        assert_eq!(
            fel.spi_run(&[opcodes::SELECT, opcodes::DESELECT]),
            Err(Error::TransportFailure)
        );
    }

    #[test]
    fn test_rejects_oversized_stream() {
        let mut fel = w25n01gv();
        let stream = vec![opcodes::END; 4098];
        assert_eq!(fel.spi_run(&stream), Err(Error::TransportFailure));
    }

    #[test]
    fn test_rejects_access_outside_swap() {
        let mut fel = w25n01gv();
        let mut buf = [0u8; 16];
        assert_eq!(fel.read(0x0001_0000, &mut buf), Err(Error::TransportFailure));
        let end = 0x0002_0000 + 128 * 2048;
        assert_eq!(fel.write(end - 8, &buf), Err(Error::TransportFailure));
    }

    #[test]
    fn test_fast_outside_select() {
        let mut fel = w25n01gv();
        assert_eq!(
            fel.spi_run(&[opcodes::FAST, 1, nand_ops::WREN, opcodes::END]),
            Err(Error::TransportFailure)
        );
    }

    #[test]
    fn test_program_needs_write_enable() {
        let mut fel = w25n01gv();
        fel.spi_run(&[
            opcodes::SELECT,
            opcodes::FAST,
            4,
            nand_ops::PROGRAM_EXEC,
            0,
            0,
            5,
            opcodes::DESELECT,
            opcodes::END,
        ])
        .unwrap();
        assert!(fel.programmed().is_empty());
    }

    #[test]
    fn test_locked_erase_fails() {
        let mut fel = DummyFel::new(
            DummyConfig::new(chip::find_by_name("W25N01GV").unwrap()).locked(),
        );
        fel.spi_run(&[
            opcodes::SELECT,
            opcodes::FAST,
            1,
            nand_ops::WREN,
            opcodes::DESELECT,
            opcodes::SELECT,
            opcodes::FAST,
            4,
            nand_ops::BLOCK_ERASE,
            0,
            0,
            64,
            opcodes::DESELECT,
            opcodes::END,
        ])
        .unwrap();
        assert!(fel.erased().is_empty());
        assert_eq!(fel.registers().status & 0x04, 0x04);
    }

    #[test]
    fn test_disconnect() {
        let mut fel = w25n01gv();
        fel.disconnect();
        assert_eq!(fel.spi_init(), Err(Error::TransportFailure));
        assert_eq!(fel.reset(), Err(Error::TransportFailure));
    }

    #[test]
    fn test_with_image() {
        let chip = chip::find_by_name("W25N01GV").unwrap();
        let mut image = vec![0xFF; 3 * 2048];
        image[2048] = 0x00;
        let fel = DummyFel::with_image(DummyConfig::new(chip), &image);
        assert_eq!(fel.written_pages(), vec![1]);
        assert_eq!(fel.page(1)[0], 0x00);
        assert_eq!(fel.page(0), vec![0xFF; 2048]);
    }
}
