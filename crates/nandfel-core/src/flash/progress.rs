//! Progress reporting for long-running operations

/// Progress callback for erase, dump and restore
///
/// Orchestrators call [`start`](Progress::start) once with the number of
/// bytes the run covers, [`advance`](Progress::advance) between batches with
/// the bytes just completed, and [`finish`](Progress::finish) on success.
/// The increments of a complete run sum to the total.
pub trait Progress {
    /// Called before the first batch
    fn start(&mut self, total_bytes: u64);

    /// Called after each batch with the bytes it covered
    fn advance(&mut self, bytes: u64);

    /// Called after the last batch
    fn finish(&mut self);
}

/// No-op progress implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _total_bytes: u64) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
}
