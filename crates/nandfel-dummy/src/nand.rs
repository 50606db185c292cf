//! Emulated SPI-NAND chip
//!
//! The chip sees one chip-select transaction at a time: the bytes the host
//! shifted out while selected. Reads (`RXBUF`) are answered from the bytes
//! seen so far; everything else takes effect when chip select is released.

use std::collections::BTreeMap;

use nandfel_core::chip::ChipDescriptor;
use nandfel_core::error::{Error, Result};
use nandfel_core::protocol::{opcodes, ConfigFlags, StatusFlags};
use nandfel_core::status::FeatureRegisters;

use crate::{Event, Faults, IdMode};

/// Block protect bits of the protection register (BP0..BP3 and TB)
pub const BP_MASK: u8 = 0x7C;

/// Power-on protection register value of a locked chip
pub const LOCKED: u8 = 0x7C;

pub(crate) struct NandChip {
    chip: &'static ChipDescriptor,
    id: [u8; 4],
    id_mode: IdMode,
    faults: Faults,
    /// Programmed pages; absent pages read as erased
    pages: BTreeMap<u32, Vec<u8>>,
    cache: Vec<u8>,
    protect: u8,
    config: u8,
    status: StatusFlags,
}

impl NandChip {
    pub(crate) fn new(
        chip: &'static ChipDescriptor,
        id: [u8; 4],
        id_mode: IdMode,
        registers: FeatureRegisters,
        faults: Faults,
    ) -> Self {
        Self {
            chip,
            id,
            id_mode,
            faults,
            pages: BTreeMap::new(),
            cache: vec![0xFF; chip.page_size as usize],
            protect: registers.protect,
            config: registers.config,
            status: StatusFlags::from_bits_retain(registers.status),
        }
    }

    pub(crate) fn registers(&self) -> FeatureRegisters {
        FeatureRegisters {
            protect: self.protect,
            config: self.config,
            status: self.status.bits(),
        }
    }

    pub(crate) fn page(&self, page: u32) -> Vec<u8> {
        self.pages
            .get(&page)
            .cloned()
            .unwrap_or_else(|| vec![0xFF; self.chip.page_size as usize])
    }

    pub(crate) fn store(&mut self, page: u32, data: &[u8]) {
        if data.iter().all(|&b| b == 0xFF) {
            self.pages.remove(&page);
        } else {
            self.pages.insert(page, data.to_vec());
        }
    }

    pub(crate) fn programmed_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Bytes shifted in by the chip during a receive phase
    ///
    /// `mosi` holds everything transmitted since chip select.
    pub(crate) fn miso(&self, mosi: &[u8], len: usize) -> Vec<u8> {
        match mosi.first() {
            Some(&opcodes::RDID) => {
                // Index of the first received byte after the opcode
                let start = mosi.len() - 1;
                (start..start + len).map(|k| self.id_byte(k)).collect()
            }
            Some(&opcodes::GET_FEATURE) if mosi.len() >= 2 => {
                let value = self.feature(mosi[1]);
                vec![value; len]
            }
            Some(&opcodes::READ_FROM_CACHE) if mosi.len() >= 4 => {
                let column = u16::from_be_bytes([mosi[1], mosi[2]]) as usize;
                (column..column + len)
                    .map(|i| self.cache.get(i).copied().unwrap_or(0xFF))
                    .collect()
            }
            _ => vec![0xFF; len],
        }
    }

    fn id_byte(&self, k: usize) -> u8 {
        let index = match self.id_mode {
            IdMode::AddressByte if k == 0 => return 0x00,
            IdMode::AddressByte => k - 1,
            IdMode::Legacy => k,
        };
        self.id.get(index).copied().unwrap_or(0x00)
    }

    fn feature(&self, addr: u8) -> u8 {
        match addr {
            opcodes::FEATURE_PROTECT => self.protect,
            opcodes::FEATURE_CONFIG => self.config,
            opcodes::FEATURE_STATUS => self.status.bits(),
            _ => 0x00,
        }
    }

    fn row(&self, mosi: &[u8]) -> Result<u32> {
        if mosi.len() != 4 {
            log::warn!("dummy: malformed row address {:02x?}", mosi);
            return Err(Error::TransportFailure);
        }
        let page = u32::from_be_bytes([0, mosi[1], mosi[2], mosi[3]]);
        if page >= self.chip.total_pages() {
            log::warn!("dummy: page {} out of range", page);
            return Err(Error::TransportFailure);
        }
        Ok(page)
    }

    fn locked(&self) -> bool {
        self.protect & BP_MASK != 0
    }

    /// Apply a completed chip-select transaction
    pub(crate) fn deselect(&mut self, mosi: &[u8], events: &mut Vec<Event>) -> Result<()> {
        let Some(&opcode) = mosi.first() else {
            return Ok(());
        };

        match opcode {
            opcodes::RESET => {
                self.cache.fill(0xFF);
                self.status = StatusFlags::empty();
                events.push(Event::ChipReset);
            }
            opcodes::WREN => self.status.insert(StatusFlags::WEL),
            // Responses were produced during the receive phase
            opcodes::RDID | opcodes::GET_FEATURE | opcodes::READ_FROM_CACHE => {}
            opcodes::SET_FEATURE if mosi.len() == 3 => {
                let (addr, value) = (mosi[1], mosi[2]);
                events.push(Event::SetFeature { addr, value });
                match addr {
                    opcodes::FEATURE_PROTECT if !self.faults.stuck_protect => {
                        self.protect = value
                    }
                    opcodes::FEATURE_CONFIG => {
                        self.config = if self.faults.stuck_ecc {
                            value & !ConfigFlags::ECC_EN.bits()
                        } else {
                            value
                        };
                    }
                    _ => {}
                }
            }
            opcodes::BLOCK_ERASE => {
                let page = self.row(mosi)?;
                self.block_erase(page, events);
            }
            opcodes::PAGE_TO_CACHE => {
                let page = self.row(mosi)?;
                self.cache = self.page(page);
                events.push(Event::PageRead { page });
            }
            opcodes::PROGRAM_LOAD if mosi.len() >= 3 => {
                let column = u16::from_be_bytes([mosi[1], mosi[2]]) as usize;
                self.cache.fill(0xFF);
                for (i, &b) in mosi[3..].iter().enumerate() {
                    if let Some(slot) = self.cache.get_mut(column + i) {
                        *slot = b;
                    }
                }
            }
            opcodes::PROGRAM_EXEC => {
                let page = self.row(mosi)?;
                self.program_execute(page, events);
            }
            _ => {
                log::warn!("dummy: unsupported transaction {:02x?}", mosi);
                return Err(Error::TransportFailure);
            }
        }
        Ok(())
    }

    fn block_erase(&mut self, page: u32, events: &mut Vec<Event>) {
        if !self.status.contains(StatusFlags::WEL) {
            return;
        }
        self.status.remove(StatusFlags::WEL);
        if self.locked() {
            self.status.insert(StatusFlags::E_FAIL);
            return;
        }
        self.status.remove(StatusFlags::E_FAIL);

        let first = page - page % self.chip.pages_per_block;
        let last = first + self.chip.pages_per_block;
        let doomed: Vec<u32> = self.pages.range(first..last).map(|(&p, _)| p).collect();
        for p in doomed {
            self.pages.remove(&p);
        }
        events.push(Event::BlockErase { page });
    }

    fn program_execute(&mut self, page: u32, events: &mut Vec<Event>) {
        if !self.status.contains(StatusFlags::WEL) {
            return;
        }
        self.status.remove(StatusFlags::WEL);
        if self.locked() {
            self.status.insert(StatusFlags::P_FAIL);
            return;
        }
        self.status.remove(StatusFlags::P_FAIL);

        // Programming only clears bits
        let mut data = self.page(page);
        for (cell, &b) in data.iter_mut().zip(self.cache.iter()) {
            *cell &= b;
        }
        self.store(page, &data);
        events.push(Event::ProgramExec {
            page,
            data: self.cache.clone(),
        });
    }
}
