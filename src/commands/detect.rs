//! Detect, status and reset commands

use nandfel_core::flash;
use nandfel_core::status;
use nandfel_core::transport::FelTransport;

use super::mib;

/// Identify the chip without touching its protection
pub fn run_detect<T: FelTransport + ?Sized>(
    transport: &mut T,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = flash::detect(transport)?;
    let chip = session.chip;

    println!("Found SPI-NAND chip:");
    println!("  Name:      {}", chip.name);
    println!("  ID:        {:02X?}", chip.id.as_bytes());
    println!("  Capacity:  {} MiB", mib(chip.capacity()));
    println!(
        "  Geometry:  {} blocks x {} pages x {} bytes (+{} spare)",
        chip.total_blocks(),
        chip.pages_per_block,
        chip.page_size,
        chip.spare_size
    );
    if chip.planes_per_die > 1 || chip.dies > 1 {
        println!(
            "  Layout:    {} die(s), {} plane(s) per die",
            chip.dies, chip.planes_per_die
        );
    }
    Ok(())
}

/// Print the feature registers as a vendor bit table
pub fn run_status<T: FelTransport + ?Sized>(
    transport: &mut T,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = flash::detect(transport)?;
    let report = status::read_status(transport, &session)?;

    println!("{} ({} layout)", session.chip.name, report.layout.family);
    println!();
    print!("{}", report);
    Ok(())
}

/// Restart the target
pub fn run_reset<T: FelTransport + ?Sized>(
    transport: &mut T,
) -> Result<(), Box<dyn std::error::Error>> {
    transport.reset()?;
    println!("Target reset");
    Ok(())
}
