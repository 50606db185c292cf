//! Man page generator for nandfel
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::PathBuf;

#[path = "../cli.rs"]
mod cli;

fn main() -> std::io::Result<()> {
    // Default to ./man directory
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    let man = clap_mangen::Man::new(cmd.clone());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    let output_path = output_dir.join("nandfel.1");
    fs::write(&output_path, buffer)?;
    println!("Man page generated at: {}", output_path.display());

    // One page per subcommand, named like git's
    for sub in cmd.get_subcommands() {
        let man = clap_mangen::Man::new(sub.clone());
        let mut buffer = Vec::new();
        man.render(&mut buffer)?;
        fs::write(
            output_dir.join(format!("nandfel-{}.1", sub.get_name())),
            buffer,
        )?;
    }

    println!("\nTo view the man page:");
    println!("  man -l {}", output_path.display());
    Ok(())
}
