//! Erase command implementation

use std::time::Instant;

use nandfel_core::flash::{self, BatchConfig};
use nandfel_core::transport::FelTransport;

use super::IndicatifProgress;

/// Erase every block of the chip
pub fn run_erase<T: FelTransport + ?Sized>(
    transport: &mut T,
    batches: &BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = flash::init(transport, true)?;
    let config = batches.fitted(&session)?;

    println!(
        "Erasing {} blocks of {}",
        session.chip.total_blocks(),
        session.chip.name
    );

    let started = Instant::now();
    let mut progress = IndicatifProgress::new(&["Erasing"]);
    flash::erase(transport, &session, &config, &mut progress)?;

    println!("Chip erase complete in {:.2?}", started.elapsed());
    Ok(())
}
