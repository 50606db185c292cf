//! Static SPI-NAND chip registry
//!
//! The registry is an ordered, immutable list. Identification walks it in
//! order and the first entry whose ID prefix matches wins, so entries must
//! not share a prefix over their declared ID length.

use super::types::ChipDescriptor;

/// Known SPI-NAND chips
pub static CHIPS: &[ChipDescriptor] = &[
    // Winbond
    ChipDescriptor::new("W25N512GV", &[0xEF, 0xAA, 0x20], 2048, 64, 64, 512, 1, 1),
    ChipDescriptor::new("W25N01GV", &[0xEF, 0xAA, 0x21], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("W25M02GV", &[0xEF, 0xAB, 0x21], 2048, 64, 64, 1024, 1, 2),
    ChipDescriptor::new("W25N02KV", &[0xEF, 0xAA, 0x22], 2048, 128, 64, 2048, 1, 1),

    // Gigadevice
    ChipDescriptor::new("GD5F1GQ4UAWxx", &[0xC8, 0x10], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("GD5F1GQ5UExxG", &[0xC8, 0x51], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("GD5F1GQ4UExIG", &[0xC8, 0xD1], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("GD5F1GQ4UExxH", &[0xC8, 0xD9], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("GD5F1GQ4xAYIG", &[0xC8, 0xF1], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("GD5F2GQ4UExIG", &[0xC8, 0xD2], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F2GQ5UExxH", &[0xC8, 0x32], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F2GQ4xAYIG", &[0xC8, 0xF2], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F4GQ4UBxIG", &[0xC8, 0xD4], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F4GQ4xAYIG", &[0xC8, 0xF4], 2048, 64, 64, 4096, 1, 1),
    ChipDescriptor::new("GD5F2GQ5UExxG", &[0xC8, 0x52], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F4GQ4UCxIG", &[0xC8, 0xB4], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("GD5F4GQ4RCxIG", &[0xC8, 0xA4], 4096, 256, 64, 2048, 1, 1),

    // Macronix
    ChipDescriptor::new("MX35LF1GE4AB", &[0xC2, 0x12], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("MX35LF1G24AD", &[0xC2, 0x14], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("MX31LF1GE4BC", &[0xC2, 0x1E], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("MX35LF2GE4AB", &[0xC2, 0x22], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("MX35LF2G24AD", &[0xC2, 0x24], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("MX35LF2GE4AD", &[0xC2, 0x26], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("MX35LF2G14AC", &[0xC2, 0x20], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("MX35LF4G24AD", &[0xC2, 0x35], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("MX35LF4GE4AD", &[0xC2, 0x37], 4096, 256, 64, 2048, 1, 1),

    // Micron
    ChipDescriptor::new("MT29F1G01AAADD", &[0x2C, 0x12], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("MT29F1G01ABAFD", &[0x2C, 0x14], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("MT29F2G01AAAED", &[0x2C, 0x9F], 2048, 64, 64, 2048, 2, 1),
    ChipDescriptor::new("MT29F2G01ABAGD", &[0x2C, 0x24], 2048, 128, 64, 2048, 2, 1),
    ChipDescriptor::new("MT29F4G01AAADD", &[0x2C, 0x32], 2048, 64, 64, 4096, 2, 1),
    ChipDescriptor::new("MT29F4G01ABAFD", &[0x2C, 0x34], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("MT29F4G01ADAGD", &[0x2C, 0x36], 2048, 128, 64, 2048, 2, 2),
    ChipDescriptor::new("MT29F8G01ADAFD", &[0x2C, 0x46], 4096, 256, 64, 2048, 1, 2),

    // Toshiba
    ChipDescriptor::new("TC58CVG0S3HRAIG", &[0x98, 0xC2], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("TC58CVG1S3HRAIG", &[0x98, 0xCB], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("TC58CVG2S0HRAIG", &[0x98, 0xCD], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("TC58CVG0S3HRAIJ", &[0x98, 0xE2], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("TC58CVG1S3HRAIJ", &[0x98, 0xEB], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("TC58CVG2S0HRAIJ", &[0x98, 0xED], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("TH58CVG3S0HRAIJ", &[0x98, 0xE4], 4096, 256, 64, 4096, 1, 1),

    // Esmt
    ChipDescriptor::new("F50L512M41A", &[0xC8, 0x20], 2048, 64, 64, 512, 1, 1),
    ChipDescriptor::new("F50L1G41A", &[0xC8, 0x21], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("F50L1G41LB", &[0xC8, 0x01], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("F50L2G41LB", &[0xC8, 0x0A], 2048, 64, 64, 1024, 1, 2),

    // Fison
    ChipDescriptor::new("CS11G0T0A0AA", &[0x6B, 0x00], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("CS11G0G0A0AA", &[0x6B, 0x10], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("CS11G0S0A0AA", &[0x6B, 0x20], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("CS11G1T0A0AA", &[0x6B, 0x01], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("CS11G1S0A0AA", &[0x6B, 0x21], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("CS11G2T0A0AA", &[0x6B, 0x02], 2048, 128, 64, 4096, 1, 1),
    ChipDescriptor::new("CS11G2S0A0AA", &[0x6B, 0x22], 2048, 64, 64, 4096, 1, 1),

    // Etron
    ChipDescriptor::new("EM73B044VCA", &[0xD5, 0x01], 2048, 64, 64, 512, 1, 1),
    ChipDescriptor::new("EM73C044SNB", &[0xD5, 0x11], 2048, 120, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044SNF", &[0xD5, 0x09], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044VCA", &[0xD5, 0x18], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044SNA", &[0xD5, 0x19], 2048, 64, 128, 512, 1, 1),
    ChipDescriptor::new("EM73C044VCD", &[0xD5, 0x1C], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044SND", &[0xD5, 0x1D], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73D044SND", &[0xD5, 0x1E], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73C044VCC", &[0xD5, 0x22], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044VCF", &[0xD5, 0x25], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73C044SNC", &[0xD5, 0x31], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73D044SNC", &[0xD5, 0x0A], 2048, 120, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044SNA", &[0xD5, 0x12], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044SNF", &[0xD5, 0x10], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCA", &[0xD5, 0x13], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCB", &[0xD5, 0x14], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCD", &[0xD5, 0x17], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCH", &[0xD5, 0x1B], 2048, 64, 64, 2048, 1, 1),
    // EM73D044SND shares ID D5 1D with an earlier entry and is unreachable
    ChipDescriptor::new("EM73D044VCG", &[0xD5, 0x1F], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCE", &[0xD5, 0x20], 2048, 64, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044VCL", &[0xD5, 0x2E], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73D044SNB", &[0xD5, 0x32], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73E044SNA", &[0xD5, 0x03], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73E044SND", &[0xD5, 0x0B], 4096, 240, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73E044SNB", &[0xD5, 0x23], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73E044VCA", &[0xD5, 0x2C], 4096, 256, 64, 2048, 1, 1),
    ChipDescriptor::new("EM73E044VCB", &[0xD5, 0x2F], 2048, 128, 64, 4096, 1, 1),
    ChipDescriptor::new("EM73F044SNA", &[0xD5, 0x24], 4096, 256, 64, 4096, 1, 1),
    ChipDescriptor::new("EM73F044VCA", &[0xD5, 0x2D], 4096, 256, 64, 4096, 1, 1),
    ChipDescriptor::new("EM73E044SNE", &[0xD5, 0x0E], 4096, 256, 64, 4096, 1, 1),
    ChipDescriptor::new("EM73C044SNG", &[0xD5, 0x0C], 2048, 120, 64, 1024, 1, 1),
    ChipDescriptor::new("EM73D044VCN", &[0xD5, 0x0F], 2048, 64, 64, 2048, 1, 1),

    // Elnec
    ChipDescriptor::new("FM35Q1GA", &[0xE5, 0x71], 2048, 64, 64, 1024, 1, 1),

    // Paragon
    ChipDescriptor::new("PN26G01A", &[0xA1, 0xE1], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("PN26G02A", &[0xA1, 0xE2], 2048, 128, 64, 2048, 1, 1),

    // Ato
    ChipDescriptor::new("ATO25D1GA", &[0x9B, 0x12], 2048, 64, 64, 1024, 1, 1),

    // Heyang
    ChipDescriptor::new("HYF1GQ4U", &[0xC9, 0x51], 2048, 128, 64, 1024, 1, 1),
    ChipDescriptor::new("HYF2GQ4U", &[0xC9, 0x52], 2048, 128, 64, 2048, 1, 1),
    ChipDescriptor::new("HYF4GQ4U", &[0xC9, 0x54], 2048, 128, 64, 4096, 1, 1),

    // FORESEE
    ChipDescriptor::new("F35SQA001G", &[0xCD, 0x71, 0x71], 2048, 64, 64, 1024, 1, 1),
    ChipDescriptor::new("F35SQA002G", &[0xCD, 0x72, 0x72], 2048, 64, 64, 2048, 1, 1),
];

/// Find the first chip whose declared ID prefix matches a raw response
pub fn find_by_id(response: &[u8]) -> Option<&'static ChipDescriptor> {
    CHIPS.iter().find(|c| c.id.matches(response))
}

/// Find a chip by exact model name (case-insensitive)
pub fn find_by_name(name: &str) -> Option<&'static ChipDescriptor> {
    CHIPS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Iterate over chips of one manufacturer
pub fn find_by_manufacturer(manufacturer: u8) -> impl Iterator<Item = &'static ChipDescriptor> {
    CHIPS
        .iter()
        .filter(move |c| c.id.manufacturer() == manufacturer)
}
