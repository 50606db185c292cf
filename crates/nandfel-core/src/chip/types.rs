//! SPI-NAND chip type definitions

/// Identification byte sequence of a chip
///
/// Vendors answer the read-ID instruction with 2 to 4 meaningful bytes;
/// only the first `len` bytes take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipId {
    bytes: [u8; 4],
    len: u8,
}

impl ChipId {
    /// Create an ID from its significant bytes (at most 4 are kept)
    pub const fn new(id: &[u8]) -> Self {
        let mut bytes = [0u8; 4];
        let mut i = 0;
        while i < id.len() && i < 4 {
            bytes[i] = id[i];
            i += 1;
        }
        Self { bytes, len: i as u8 }
    }

    /// The significant ID bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of significant bytes
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true if the ID has no significant bytes
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Manufacturer byte (first ID byte)
    pub const fn manufacturer(&self) -> u8 {
        self.bytes[0]
    }

    /// Check a raw identification response against this ID
    ///
    /// Only the declared length is compared; trailing response bytes are
    /// ignored.
    pub fn matches(&self, response: &[u8]) -> bool {
        response.len() >= self.len() && &response[..self.len()] == self.as_bytes()
    }
}

/// Geometry of a SPI-NAND chip
///
/// Entries are immutable and owned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDescriptor {
    /// Chip model name (e.g., "W25N01GV")
    pub name: &'static str,
    /// Identification bytes
    pub id: ChipId,
    /// Data area of a page, in bytes
    pub page_size: u32,
    /// Spare (OOB) area of a page, in bytes. Informational only.
    pub spare_size: u32,
    /// Pages per erase block
    pub pages_per_block: u32,
    /// Erase blocks per die
    pub blocks_per_die: u32,
    /// Planes per die
    pub planes_per_die: u32,
    /// Number of dies
    pub dies: u32,
}

impl ChipDescriptor {
    /// Create a descriptor
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: &'static str,
        id: &[u8],
        page_size: u32,
        spare_size: u32,
        pages_per_block: u32,
        blocks_per_die: u32,
        planes_per_die: u32,
        dies: u32,
    ) -> Self {
        Self {
            name,
            id: ChipId::new(id),
            page_size,
            spare_size,
            pages_per_block,
            blocks_per_die,
            planes_per_die,
            dies,
        }
    }

    /// Capacity reported at identification time, in bytes
    ///
    /// `page_size * pages_per_block * blocks_per_die * dies`. Planes are not a
    /// factor here, unlike [`total_pages`](Self::total_pages); for chips with
    /// more than one plane per die the two disagree.
    pub const fn capacity(&self) -> u64 {
        self.page_size as u64
            * self.pages_per_block as u64
            * self.blocks_per_die as u64
            * self.dies as u64
    }

    /// Number of pages visited by erase, dump and restore
    ///
    /// `pages_per_block * blocks_per_die * dies * planes_per_die`.
    pub const fn total_pages(&self) -> u32 {
        self.pages_per_block * self.blocks_per_die * self.dies * self.planes_per_die
    }

    /// Number of erase blocks visited by erase
    pub const fn total_blocks(&self) -> u32 {
        self.total_pages() / self.pages_per_block
    }

    /// Bytes covered by the page range (`total_pages * page_size`)
    ///
    /// This is the length of a dump and of a restore image.
    pub const fn image_size(&self) -> u64 {
        self.total_pages() as u64 * self.page_size as u64
    }

    /// Size of an erase block in bytes (data area only)
    pub const fn block_size(&self) -> u32 {
        self.pages_per_block * self.page_size
    }
}

/// SPI-NAND manufacturer ID bytes
pub mod manufacturer {
    /// Winbond
    pub const WINBOND: u8 = 0xEF;
    /// GigaDevice (also used by some ESMT parts)
    pub const GIGADEVICE: u8 = 0xC8;
    /// Macronix
    pub const MACRONIX: u8 = 0xC2;
    /// Micron
    pub const MICRON: u8 = 0x2C;
    /// Toshiba / Kioxia
    pub const TOSHIBA: u8 = 0x98;
    /// Fison
    pub const FISON: u8 = 0x6B;
    /// Etron
    pub const ETRON: u8 = 0xD5;
    /// Elnec
    pub const ELNEC: u8 = 0xE5;
    /// Paragon
    pub const PARAGON: u8 = 0xA1;
    /// ATO
    pub const ATO: u8 = 0x9B;
    /// Heyang
    pub const HEYANG: u8 = 0xC9;
    /// FORESEE
    pub const FORESEE: u8 = 0xCD;
}
