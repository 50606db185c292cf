//! Write command implementation

use std::path::Path;
use std::time::Instant;

use nandfel_core::flash::{self, BatchConfig};
use nandfel_core::image;
use nandfel_core::transport::FelTransport;

use super::checksum::{self, Verified};
use super::IndicatifProgress;

/// Run the write command: erase the chip, then program the image
///
/// The file is checked against its MD5 sidecar before the target is touched.
pub fn run_write<T: FelTransport + ?Sized>(
    transport: &mut T,
    batches: &BatchConfig,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read(input)?;
    match checksum::verify_sidecar(input, &raw)? {
        Verified::Match(digest) => println!("MD5 OK: {}", digest),
        Verified::NoSidecar(digest) => println!(
            "MD5: {} ({} not found, skipping check)",
            digest,
            checksum::sidecar_path(input).display()
        ),
    }

    let session = flash::detect(transport)?;
    let data = image::prepare(session.chip, raw)?;
    let config = batches.fitted(&session)?;

    println!(
        "Writing {} bytes from {} to {}",
        data.len(),
        input.display(),
        session.chip.name
    );

    let started = Instant::now();
    let mut progress = IndicatifProgress::new(&["Erasing", "Writing"]);
    flash::write_image(transport, &config, &data, &mut progress)?;

    println!("Write complete in {:.2?}", started.elapsed());
    Ok(())
}
