//! Feature register decoding
//!
//! Renders the protection, configuration and status registers as bit tables.
//! Bit names differ per vendor family, keyed by the manufacturer ID byte;
//! only GigaDevice and Winbond layouts are known.

use core::fmt;

use crate::chip::manufacturer;
use crate::error::{Error, Result};

/// Raw values of the three feature registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureRegisters {
    /// Protection register (0xA0)
    pub protect: u8,
    /// Configuration register (0xB0)
    pub config: u8,
    /// Status register (0xC0)
    pub status: u8,
}

impl FeatureRegisters {
    /// Register values in display order
    pub fn values(&self) -> [u8; 3] {
        [self.protect, self.config, self.status]
    }
}

/// Bit labels of the three registers, most significant bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLayout {
    /// Vendor family name
    pub family: &'static str,
    /// Labels per register, bit 7 first
    pub labels: [[&'static str; 8]; 3],
}

/// GigaDevice bit layout
pub static GIGADEVICE_LAYOUT: StatusLayout = StatusLayout {
    family: "GigaDevice",
    labels: [
        ["BRWD", "RES", "BP2", "BP1", "BP0", "INV", "CMP", "RES"],
        ["OTP-PRT", "OTP-EN", "RES", "ECC-EN", "BPL", "RES", "RES", "QE"],
        ["RES", "RES", "ECCS1", "ECCS0", "P-FAIL", "E-FAIL", "WEL", "OIP"],
    ],
};

/// Winbond bit layout
pub static WINBOND_LAYOUT: StatusLayout = StatusLayout {
    family: "Winbond",
    labels: [
        ["SRP0", "BP3", "BP2", "BP1", "BP0", "TB", "WP-E", "SRP1"],
        ["OTP-L", "OTP-E", "SR1-L", "ECC-E", "BUF", "RES", "RES", "RES"],
        ["RES", "LUT-F", "ECC-1", "ECC-0", "P-FAIL", "E-FAIL", "WEL", "BUSY"],
    ],
};

/// Look up the bit layout for a manufacturer ID byte
pub fn layout_for(id: u8) -> Result<&'static StatusLayout> {
    match id {
        manufacturer::GIGADEVICE => Ok(&GIGADEVICE_LAYOUT),
        manufacturer::WINBOND => Ok(&WINBOND_LAYOUT),
        _ => Err(Error::UnknownStatusLayout { manufacturer: id }),
    }
}

/// Decoded register snapshot, printable as a bit table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Bit layout used for rendering
    pub layout: &'static StatusLayout,
    /// Register values
    pub registers: FeatureRegisters,
}

impl StatusReport {
    /// Decode registers read from a chip of the given manufacturer
    pub fn new(id: u8, registers: FeatureRegisters) -> Result<Self> {
        Ok(Self {
            layout: layout_for(id)?,
            registers,
        })
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (value, labels)) in self
            .registers
            .values()
            .iter()
            .zip(self.layout.labels.iter())
            .enumerate()
        {
            if n > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Status {}: 0x{:02X}", n + 1, value)?;
            for (bit, label) in labels.iter().enumerate() {
                let sep = if bit == 7 { "\n" } else { "\t" };
                write!(f, "{}{}", label, sep)?;
            }
            for bit in 0..8 {
                let sep = if bit == 7 { "\n" } else { "\t" };
                write!(f, "{}{}", (value >> (7 - bit)) & 1, sep)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
mod read {
    use maybe_async::maybe_async;

    use super::{FeatureRegisters, StatusReport};
    use crate::error::Result;
    use crate::flash::Session;
    use crate::protocol::{self, opcodes};
    use crate::transport::FelTransport;

    /// Read the three feature registers
    #[maybe_async]
    pub async fn read_registers<T: FelTransport + ?Sized>(
        transport: &mut T,
        session: &Session,
    ) -> Result<FeatureRegisters> {
        let swap = &session.swap;
        Ok(FeatureRegisters {
            protect: protocol::get_feature(transport, swap, opcodes::FEATURE_PROTECT).await?,
            config: protocol::get_feature(transport, swap, opcodes::FEATURE_CONFIG).await?,
            status: protocol::get_feature(transport, swap, opcodes::FEATURE_STATUS).await?,
        })
    }

    /// Read and decode the feature registers of the session's chip
    ///
    /// Fails with [`UnknownStatusLayout`](crate::Error::UnknownStatusLayout)
    /// before any register access if the vendor family is unknown.
    #[maybe_async]
    pub async fn read_status<T: FelTransport + ?Sized>(
        transport: &mut T,
        session: &Session,
    ) -> Result<StatusReport> {
        let layout = super::layout_for(session.chip.id.manufacturer())?;
        let registers = read_registers(transport, session).await?;
        Ok(StatusReport { layout, registers })
    }
}

#[cfg(feature = "alloc")]
pub use read::*;

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_gigadevice_table() {
        let report = StatusReport::new(
            0xC8,
            FeatureRegisters {
                protect: 0x38,
                config: 0x11,
                status: 0x03,
            },
        )
        .unwrap();
        let text = report.to_string();
        let expected = "Status 1: 0x38\n\
                        BRWD\tRES\tBP2\tBP1\tBP0\tINV\tCMP\tRES\n\
                        0\t0\t1\t1\t1\t0\t0\t0\n\
                        \n\
                        Status 2: 0x11\n\
                        OTP-PRT\tOTP-EN\tRES\tECC-EN\tBPL\tRES\tRES\tQE\n\
                        0\t0\t0\t1\t0\t0\t0\t1\n\
                        \n\
                        Status 3: 0x03\n\
                        RES\tRES\tECCS1\tECCS0\tP-FAIL\tE-FAIL\tWEL\tOIP\n\
                        0\t0\t0\t0\t0\t0\t1\t1\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_winbond_labels() {
        let report = StatusReport::new(0xEF, FeatureRegisters::default()).unwrap();
        let text = report.to_string();
        assert!(text.contains("SRP0\tBP3\tBP2\tBP1\tBP0\tTB\tWP-E\tSRP1"));
        assert!(text.contains("RES\tLUT-F\tECC-1\tECC-0\tP-FAIL\tE-FAIL\tWEL\tBUSY"));
        assert_eq!(report.layout.family, "Winbond");
    }

    #[test]
    fn test_unknown_family() {
        assert_eq!(
            StatusReport::new(0xC2, FeatureRegisters::default()),
            Err(Error::UnknownStatusLayout { manufacturer: 0xC2 })
        );
    }

    #[test]
    fn test_layouts_have_eight_labels() {
        for layout in [&GIGADEVICE_LAYOUT, &WINBOND_LAYOUT] {
            for labels in layout.labels {
                assert!(labels.iter().all(|l| !l.is_empty()));
            }
        }
    }
}
