#![allow(dead_code)]

use nandfel_core::chip::ChipDescriptor;
use nandfel_core::flash::{Progress, Session};
use nandfel_dummy::{DummyConfig, DummyFel};

/// Small two-plane chip: 16 blocks of 4 pages of 64 bytes
pub static TINY: ChipDescriptor =
    ChipDescriptor::new("TINY", &[0xEF, 0xAA, 0x21], 64, 16, 4, 8, 2, 1);

/// Records every progress callback
#[derive(Debug, Default)]
pub struct Recorder {
    pub total: Option<u64>,
    pub steps: Vec<u64>,
    pub finished: bool,
}

impl Recorder {
    pub fn sum(&self) -> u64 {
        self.steps.iter().sum()
    }
}

impl Progress for Recorder {
    fn start(&mut self, total_bytes: u64) {
        self.total = Some(total_bytes);
    }

    fn advance(&mut self, bytes: u64) {
        self.steps.push(bytes);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

pub fn tiny() -> (DummyFel, Session) {
    tiny_with_image(&[])
}

pub fn tiny_with_image(image: &[u8]) -> (DummyFel, Session) {
    let config = DummyConfig::new(&TINY);
    let session = Session::new(&TINY, config.swap);
    (DummyFel::with_image(config, image), session)
}

/// Image where `pattern[i]` fills page `i` (0xFF leaves it empty)
pub fn image(pattern: &[u8]) -> Vec<u8> {
    let page = TINY.page_size as usize;
    let mut out = vec![0xFF; TINY.image_size() as usize];
    for (i, &fill) in pattern.iter().enumerate() {
        for (j, byte) in out[i * page..(i + 1) * page].iter_mut().enumerate() {
            *byte = if fill == 0xFF { 0xFF } else { fill ^ j as u8 };
        }
    }
    out
}
