//! List commands implementation

use nandfel_core::chip;

use crate::programmers;

/// List all available programmers
pub fn list_programmers() {
    let programmers = programmers::available_programmers();
    if programmers.is_empty() {
        println!("No programmers available (recompile with programmer features enabled)");
        return;
    }

    println!("Available programmers:");
    println!();
    for p in &programmers {
        let aliases = if p.aliases.is_empty() {
            String::new()
        } else {
            format!(" (also: {})", p.aliases.join(", "))
        };
        println!("  {:<10} - {}{}", p.name, p.description, aliases);
    }
}

/// List all supported chips
pub fn list_chips(name_filter: Option<&str>) {
    println!("Supported SPI-NAND chips:");
    println!();
    println!(
        "{:<20} {:<12} {:>9} {:>6} {:>6}",
        "Name", "ID", "Size", "Page", "Spare"
    );
    println!("{}", "-".repeat(57));

    let filter = name_filter.map(str::to_lowercase);
    for chip in chip::CHIPS {
        if let Some(filter) = &filter {
            if !chip.name.to_lowercase().starts_with(filter.as_str()) {
                continue;
            }
        }

        let id: Vec<String> = chip
            .id
            .as_bytes()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect();

        println!(
            "{:<20} {:<12} {:>9} {:>6} {:>6}",
            chip.name,
            id.join(" "),
            format_size(chip.capacity()),
            chip.page_size,
            chip.spare_size
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{} GiB", bytes / (1024 * 1024 * 1024))
    } else if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else {
        format!("{} KiB", bytes / 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(128 * 1024 * 1024), "128 MiB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2 GiB");
        assert_eq!(format_size(4096), "4 KiB");
    }
}
