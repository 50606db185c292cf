//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all programmers, with
//! support for feature-gated inclusion, and opens them from a
//! `name[:key=value,...]` selection string.

use std::collections::HashMap;

use nandfel_core::transport::{FelTransport, TransportInfo};
use thiserror::Error;

/// A programmer ready for use by the engine
pub type Programmer = Box<dyn FelTransport + Send>;

/// Errors in the programmer selection string
#[derive(Debug, Error)]
pub enum CliError {
    /// Programmer name not known or not compiled in
    #[error("Unknown programmer: {0} (see list-programmers)")]
    UnknownProgrammer(String),

    /// Malformed `key=value` option
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),

    /// Option not understood by the selected programmer
    #[error("Unknown parameter '{key}' for programmer {programmer}")]
    UnknownParameter {
        programmer: &'static str,
        key: String,
    },

    /// Option value not valid
    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },

    /// Chip name not in the registry
    #[error("Unknown chip: {0} (see list-chips)")]
    UnknownChip(String),
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<TransportInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(TransportInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory SPI-NAND emulator (chip=<name>,image=<file>,locked=<0|1>)",
    });

    programmers
}

/// Parsed programmer parameters
pub struct ProgrammerParams {
    /// Programmer name as given
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

/// Parse a programmer string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_programmer_params(s: &str) -> Result<ProgrammerParams, CliError> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            let (key, value) = opt
                .split_once('=')
                .ok_or_else(|| CliError::InvalidParameter(opt.to_string()))?;
            params.insert(key.to_string(), value.to_string());
        }
    }

    Ok(ProgrammerParams {
        name: name.to_string(),
        params,
    })
}

/// Open a programmer from its selection string
pub fn open_programmer(programmer: &str) -> Result<Programmer, Box<dyn std::error::Error>> {
    let params = parse_programmer_params(programmer)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" | "emulator" => open_dummy(&params),

        _ => Err(CliError::UnknownProgrammer(params.name).into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &ProgrammerParams) -> Result<Programmer, Box<dyn std::error::Error>> {
    use nandfel_core::{chip, image};
    use nandfel_dummy::{DummyConfig, DummyFel};

    for key in params.params.keys() {
        if !matches!(key.as_str(), "chip" | "image" | "locked") {
            return Err(CliError::UnknownParameter {
                programmer: "dummy",
                key: key.clone(),
            }
            .into());
        }
    }

    let name = params
        .params
        .get("chip")
        .map(String::as_str)
        .unwrap_or("W25N01GV");
    let chip = chip::find_by_name(name).ok_or_else(|| CliError::UnknownChip(name.to_string()))?;

    let mut config = DummyConfig::new(chip);
    if let Some(value) = params.params.get("locked") {
        match value.as_str() {
            "1" | "yes" | "true" => config = config.locked(),
            "0" | "no" | "false" => {}
            _ => {
                return Err(CliError::InvalidValue {
                    key: "locked".to_string(),
                    value: value.clone(),
                }
                .into())
            }
        }
    }

    let dummy = match params.params.get("image") {
        Some(path) => {
            let data = image::prepare(chip, std::fs::read(path)?)?;
            log::info!("dummy: preloaded {} bytes from {}", data.len(), path);
            DummyFel::with_image(config, &data)
        }
        None => DummyFel::new(config),
    };

    log::debug!("dummy: emulating {}", chip.name);
    Ok(Box::new(dummy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_params() {
        let params = parse_programmer_params("dummy:chip=W25N512GV,locked=1").unwrap();
        assert_eq!(params.name, "dummy");
        assert_eq!(params.params.get("chip").unwrap(), "W25N512GV");
        assert_eq!(params.params.get("locked").unwrap(), "1");
    }

    #[test]
    fn test_parse_bare_name() {
        let params = parse_programmer_params("dummy").unwrap();
        assert_eq!(params.name, "dummy");
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_value() {
        assert!(matches!(
            parse_programmer_params("dummy:locked"),
            Err(CliError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unknown_programmer() {
        assert!(open_programmer("ch341a").is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        assert!(open_programmer("dummy:chip=GD5F1GQ4UExIG").is_ok());
        assert!(open_programmer("dummy:chip=NOPE").is_err());
        assert!(open_programmer("dummy:speed=4").is_err());
        assert!(open_programmer("dummy:locked=maybe").is_err());
    }
}
