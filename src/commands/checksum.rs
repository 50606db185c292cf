//! MD5 sidecar files
//!
//! A dump is saved with its digest next to it (`backup.bin` gets
//! `backup.md5`). Before a write the sidecar of the input, if present, must
//! match the file contents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use thiserror::Error;

/// Extension of the sidecar file
const SIDECAR_EXTENSION: &str = "md5";

/// Sidecar check failures
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// Digest of the data differs from the sidecar
    #[error("MD5 mismatch: {} has {expected}, computed {actual} (delete or rename it to skip the check)", .sidecar.display())]
    Mismatch {
        sidecar: PathBuf,
        expected: String,
        actual: String,
    },

    /// Sidecar does not hold a 32-digit hex digest
    #[error("Malformed MD5 file {}", .0.display())]
    Malformed(PathBuf),

    /// Reading or writing the sidecar failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Outcome of [`verify_sidecar`]
#[derive(Debug, PartialEq, Eq)]
pub enum Verified {
    /// Sidecar present and matching
    Match(String),
    /// No sidecar, carries the computed digest
    NoSidecar(String),
}

/// Lowercase hex MD5 of `data`
pub fn digest_hex(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Sidecar path for an image file
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension(SIDECAR_EXTENSION)
}

/// Write the digest of `data` next to `path`, returning the digest
pub fn write_sidecar(path: &Path, data: &[u8]) -> Result<String, ChecksumError> {
    let digest = digest_hex(data);
    fs::write(sidecar_path(path), format!("{}\n", digest))?;
    Ok(digest)
}

/// Check `data` against the sidecar of `path`
pub fn verify_sidecar(path: &Path, data: &[u8]) -> Result<Verified, ChecksumError> {
    let sidecar = sidecar_path(path);
    let actual = digest_hex(data);
    let contents = match fs::read(&sidecar) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Verified::NoSidecar(actual));
        }
        Err(e) => return Err(e.into()),
    };

    let expected =
        parse_digest(&contents).ok_or_else(|| ChecksumError::Malformed(sidecar.clone()))?;
    if expected != actual {
        return Err(ChecksumError::Mismatch {
            sidecar,
            expected,
            actual,
        });
    }
    Ok(Verified::Match(actual))
}

/// Accepts the digest with a trailing newline or NUL terminator
fn parse_digest(contents: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(contents).ok()?;
    let digest = text.trim_end_matches(|c: char| c == '\0' || c.is_ascii_whitespace());
    if digest.len() != 32 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(digest.to_ascii_lowercase())
}
