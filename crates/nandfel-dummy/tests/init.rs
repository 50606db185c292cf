mod common;

use common::Recorder;
use nandfel_core::chip;
use nandfel_core::error::Error;
use nandfel_core::flash::{self, BatchConfig, NoProgress};
use nandfel_core::protocol::RESET_DELAY_US;
use nandfel_core::status;
use nandfel_dummy::{DummyConfig, DummyFel, Event, IdMode, LOCKED};

fn config(name: &str) -> DummyConfig {
    DummyConfig::new(chip::find_by_name(name).unwrap())
}

fn set_features(fel: &DummyFel) -> Vec<(u8, u8)> {
    fel.events()
        .iter()
        .filter_map(|e| match e {
            Event::SetFeature { addr, value } => Some((*addr, *value)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_init_identifies_chip() {
    let mut fel = DummyFel::new(config("W25N01GV"));
    let session = flash::init(&mut fel, false).unwrap();
    assert_eq!(session.chip.name, "W25N01GV");
    assert_eq!(session.chip.capacity(), 128 * 1024 * 1024);
    assert_eq!(session.swap_base(), 0x0002_0000);
    assert_eq!(session.swap_len(), 128 * 2048);
}

#[test]
fn test_init_resets_and_settles() {
    let mut fel = DummyFel::new(config("W25N01GV"));
    flash::init(&mut fel, false).unwrap();
    assert!(fel.events().contains(&Event::ChipReset));
    // RESET travels inline, nothing is staged for it
    assert!(fel.events().contains(&Event::Run { len: 6 }));
    assert_eq!(fel.delayed_us(), RESET_DELAY_US as u64);
}

#[test]
fn test_init_enables_ecc() {
    let mut fel = DummyFel::new(config("W25N01GV"));
    assert_eq!(fel.registers().config & 0x10, 0);
    flash::init(&mut fel, false).unwrap();
    assert_eq!(fel.registers().config & 0x10, 0x10);
    assert_eq!(set_features(&fel), vec![(0xB0, 0x10)]);
}

#[test]
fn test_config_read_waits_for_ready() {
    let mut dummy = config("W25N01GV");
    dummy.registers.config = 0x10;
    let mut fel = DummyFel::new(dummy);
    flash::init(&mut fel, false).unwrap();

    // Busy-wait, config register read, then the final settle
    let events = fel.events();
    assert_eq!(
        events[events.len() - 5..],
        [
            Event::Run { len: 4 },
            Event::Write {
                addr: 0x0002_0000,
                len: 2
            },
            Event::Run { len: 21 },
            Event::Read {
                addr: 0x0002_0000,
                len: 1
            },
            Event::Run { len: 4 },
        ]
    );
}

#[test]
fn test_init_keeps_other_config_bits() {
    let mut dummy = config("W25N01GV");
    dummy.registers.config = 0x08;
    let mut fel = DummyFel::new(dummy);
    flash::init(&mut fel, false).unwrap();
    assert_eq!(fel.registers().config, 0x18);
}

#[test]
fn test_init_is_idempotent() {
    let mut fel = DummyFel::new(config("W25N01GV").locked());
    flash::init(&mut fel, true).unwrap();
    fel.clear_events();
    flash::init(&mut fel, true).unwrap();
    assert!(set_features(&fel).is_empty());
}

#[test]
fn test_ecc_stuck() {
    let mut dummy = config("W25N01GV");
    dummy.faults.stuck_ecc = true;
    let mut fel = DummyFel::new(dummy);
    assert_eq!(flash::init(&mut fel, false), Err(Error::EccEnableFailed));
    // The confirming read is the last thing that happened
    assert!(matches!(fel.events().last(), Some(Event::Read { len: 1, .. })));
}

#[test]
fn test_unlock_clears_protection() {
    let mut fel = DummyFel::new(config("W25N01GV").locked());
    flash::init(&mut fel, true).unwrap();
    assert_eq!(fel.registers().protect, 0);
    assert_eq!(set_features(&fel)[0], (0xA0, 0x00));
}

#[test]
fn test_read_only_init_keeps_protection() {
    let mut fel = DummyFel::new(config("W25N01GV").locked());
    flash::init(&mut fel, false).unwrap();
    assert_eq!(fel.registers().protect, LOCKED);
}

#[test]
fn test_protection_stuck() {
    let mut dummy = config("GD5F1GQ4UExIG").locked();
    dummy.faults.stuck_protect = true;
    let mut fel = DummyFel::new(dummy);
    assert_eq!(flash::init(&mut fel, true), Err(Error::ProtectionClearFailed));
    // ECC was never touched
    assert!(!set_features(&fel).iter().any(|&(addr, _)| addr == 0xB0));
}

#[test]
fn test_identify_legacy_chip() {
    let mut dummy = config("GD5F1GQ4UExIG");
    dummy.id = [0xC8, 0xD1, 0x7F, 0x7F];
    dummy.id_mode = IdMode::Legacy;
    let mut fel = DummyFel::new(dummy);
    let session = flash::detect(&mut fel).unwrap();
    assert_eq!(session.chip.name, "GD5F1GQ4UExIG");
}

#[test]
fn test_unsupported_chip() {
    let mut dummy = config("W25N01GV");
    dummy.id = [0x12, 0x34, 0x56, 0x78];
    let mut fel = DummyFel::new(dummy);
    // Reported ID is the legacy response, shifted by the dummy cycle
    assert_eq!(
        flash::init(&mut fel, false),
        Err(Error::UnsupportedChip {
            id: [0x00, 0x12, 0x34, 0x56]
        })
    );
    assert!(!fel.events().contains(&Event::ChipReset));
}

#[test]
fn test_init_transport_failure() {
    let mut fel = DummyFel::new(config("W25N01GV"));
    fel.disconnect();
    assert_eq!(flash::init(&mut fel, true), Err(Error::TransportFailure));
}

#[test]
fn test_status_report() {
    let mut fel = DummyFel::new(config("W25N01GV"));
    let session = flash::init(&mut fel, false).unwrap();
    let report = status::read_status(&mut fel, &session).unwrap();
    assert_eq!(report.layout.family, "Winbond");
    assert_eq!(report.registers.config, 0x10);
    assert!(report.to_string().starts_with("Status 1: 0x00\n"));
}

#[test]
fn test_status_unknown_family() {
    let mut fel = DummyFel::new(config("MX35LF1GE4AB"));
    let session = flash::init(&mut fel, false).unwrap();
    fel.clear_events();
    assert_eq!(
        status::read_status(&mut fel, &session),
        Err(Error::UnknownStatusLayout { manufacturer: 0xC2 })
    );
    assert!(fel.events().is_empty());
}

#[test]
fn test_write_image() {
    let chip = chip::find_by_name("W25N512GV").unwrap();
    let mut old = vec![0xFF; chip.image_size() as usize];
    old[..2048].fill(0x00);
    let mut fel = DummyFel::with_image(DummyConfig::new(chip).locked(), &old);

    let mut data = vec![0xFF; chip.image_size() as usize];
    data[2048 * 10..2048 * 11].fill(0xA5);
    data[2048 * 32767] = 0x5A;

    let mut progress = Recorder::default();
    let session =
        flash::write_image(&mut fel, &BatchConfig::default(), &data, &mut progress).unwrap();
    assert_eq!(session.chip.name, "W25N512GV");

    assert_eq!(fel.erased().len(), 512);
    assert_eq!(fel.programmed(), vec![10, 32767]);
    assert_eq!(fel.written_pages(), vec![10, 32767]);
    assert_eq!(fel.page(10), vec![0xA5; 2048]);
    assert_eq!(fel.page(0), vec![0xFF; 2048]);

    // Erase run followed by the restore run
    assert_eq!(progress.sum(), 2 * chip.image_size());
}

#[test]
fn test_write_image_wrong_size_erases_nothing() {
    let chip = chip::find_by_name("W25N512GV").unwrap();
    let mut fel = DummyFel::new(DummyConfig::new(chip));
    let data = vec![0u8; 1024];
    assert_eq!(
        flash::write_image(&mut fel, &BatchConfig::default(), &data, &mut NoProgress),
        Err(Error::ImageSizeMismatch {
            expected: chip.image_size() as usize,
            actual: 1024
        })
    );
    assert!(fel.erased().is_empty());
}
