//! Progress bars for the engine's batch operations

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use nandfel_core::flash::Progress;

/// Progress reporter using indicatif progress bars
///
/// Each run the engine starts gets its own bar, labelled with the next entry
/// of `phases`.
pub struct IndicatifProgress {
    multi: MultiProgress,
    current_bar: Option<ProgressBar>,
    phases: &'static [&'static str],
    next_phase: usize,
}

impl IndicatifProgress {
    pub fn new(phases: &'static [&'static str]) -> Self {
        Self {
            multi: MultiProgress::new(),
            current_bar: None,
            phases,
            next_phase: 0,
        }
    }

    fn create_bar(&mut self, total: u64) {
        let phase = self.phases.get(self.next_phase).copied().unwrap_or("");
        self.next_phase += 1;

        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.current_bar = Some(pb);
    }
}

impl Progress for IndicatifProgress {
    fn start(&mut self, total_bytes: u64) {
        if let Some(pb) = self.current_bar.take() {
            pb.abandon();
        }
        self.create_bar(total_bytes);
    }

    fn advance(&mut self, bytes: u64) {
        if let Some(pb) = &self.current_bar {
            pb.inc(bytes);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish();
        }
    }
}

impl Drop for IndicatifProgress {
    fn drop(&mut self) {
        // A run that failed leaves its bar where it stopped
        if let Some(pb) = self.current_bar.take() {
            pb.abandon();
        }
    }
}
