/// Trait for reporting pipeline progress.
///
/// The CLI implements this with indicatif; tests and batch runs use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_stage_start(&self, _stage: &str) {}
    fn on_item(&self, _processed: usize, _current_path: &str) {}
    fn on_stage_complete(&self, _stage: &str, _items: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
