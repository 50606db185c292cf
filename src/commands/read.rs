//! Read command implementation

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use nandfel_core::flash::{self, BatchConfig};
use nandfel_core::transport::FelTransport;

use super::{checksum, IndicatifProgress};

/// Extension given to dumps written without one
const DEFAULT_EXTENSION: &str = "bin";

/// Run the read command
pub fn run_read<T: FelTransport + ?Sized>(
    transport: &mut T,
    batches: &BatchConfig,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output_path(output);

    // Protection only blocks program and erase, so reads leave it alone
    let session = flash::detect(transport)?;
    let config = batches.fitted(&session)?;

    let started = Instant::now();
    let mut progress = IndicatifProgress::new(&["Reading"]);
    let data = flash::dump(transport, &session, &config, &mut progress)?;
    let elapsed = started.elapsed();

    let mut file = File::create(&output)?;
    file.write_all(&data)?;

    println!(
        "Wrote {} bytes to {} in {:.2?}",
        data.len(),
        output.display(),
        elapsed
    );

    // The dump is already saved, a failed sidecar only costs the check
    match checksum::write_sidecar(&output, &data) {
        Ok(digest) => println!(
            "MD5: {} ({})",
            digest,
            checksum::sidecar_path(&output).display()
        ),
        Err(e) => log::warn!("Unable to write MD5 file: {}", e),
    }
    Ok(())
}

/// Append the default extension when the name has none
fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("dump")), PathBuf::from("dump.bin"));
        assert_eq!(output_path(Path::new("dump.img")), PathBuf::from("dump.img"));
        assert_eq!(
            output_path(Path::new("out/backup")),
            PathBuf::from("out/backup.bin")
        );
    }
}
