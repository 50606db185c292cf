//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Help text for the programmer argument
const PROGRAMMER_HELP: &str =
    "Programmer to use, as name[:key=value,...] (see list-programmers)";

#[derive(Parser)]
#[command(name = "nandfel")]
#[command(author, version, about = "SPI-NAND programmer over the boot-ROM FEL interface", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Erase blocks per command stream
    #[arg(long, global = true)]
    pub erase_batch: Option<u32>,

    /// Pages per command stream when reading
    #[arg(long, global = true)]
    pub read_batch: Option<u32>,

    /// Pages per command stream when writing
    #[arg(long, global = true)]
    pub write_batch: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the attached SPI-NAND chip
    Detect {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// Show the chip's feature registers
    Status {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// Erase the whole chip
    Erase {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// Dump the whole chip to a file, with its MD5 in a ".md5" sidecar
    Read {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Output file path (".bin" is appended when it has no extension)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Erase the chip and write a file to it
    Write {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Input file path (raw image, or an old backup with spare area).
        /// A ".md5" sidecar next to it must match.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Restart the target
    Reset {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// List supported programmers
    ListProgrammers,

    /// List supported chips
    ListChips {
        /// Filter by chip name prefix (e.g. "W25N", "GD5F")
        #[arg(long)]
        filter: Option<String>,
    },
}
