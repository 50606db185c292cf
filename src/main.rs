//! nandfel - SPI-NAND programmer over the boot-ROM FEL interface
//!
//! Reads, writes and erases raw SPI-NAND chips attached to a target sitting
//! in its boot ROM's USB download mode. All chip access goes through
//! command streams executed by the boot ROM's SPI interpreter; the engine
//! lives in `nandfel-core`, this binary only selects a programmer, shows
//! progress and handles files.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use nandfel_core::flash::{
    BatchConfig, DEFAULT_ERASE_BLOCKS, DEFAULT_PROGRAM_PAGES, DEFAULT_READ_PAGES,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let batches = BatchConfig::new(
        cli.erase_batch.unwrap_or(DEFAULT_ERASE_BLOCKS),
        cli.read_batch.unwrap_or(DEFAULT_READ_PAGES),
        cli.write_batch.unwrap_or(DEFAULT_PROGRAM_PAGES),
    );

    match cli.command {
        Commands::Detect { programmer } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_detect(&mut transport)
        }
        Commands::Status { programmer } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_status(&mut transport)
        }
        Commands::Erase { programmer } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_erase(&mut transport, &batches)
        }
        Commands::Read { programmer, output } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_read(&mut transport, &batches, &output)
        }
        Commands::Write { programmer, input } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_write(&mut transport, &batches, &input)
        }
        Commands::Reset { programmer } => {
            let mut transport = programmers::open_programmer(&programmer)?;
            commands::run_reset(&mut transport)
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
        Commands::ListChips { filter } => {
            commands::list_chips(filter.as_deref());
            Ok(())
        }
    }
}
