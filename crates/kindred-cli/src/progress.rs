use indicatif::{ProgressBar, ProgressStyle};
use kindred_core::ProgressReporter;
use std::sync::Mutex;

/// CLI progress reporter using an indicatif spinner.
///
/// Totals are unknown upfront for every stage (directory walks, subprocess
/// conversion), so a counting spinner fits better than a bar.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        CliReporter {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

fn stage_message(stage: &str) -> &'static str {
    match stage {
        "stage" => "Staging corpus...",
        "convert" => "Converting documents...",
        "hash" => "Fingerprinting files...",
        "binary" => "Building presence matrix...",
        "similarity" => "Computing similarity...",
        _ => "Working...",
    }
}

impl ProgressReporter for CliReporter {
    fn on_stage_start(&self, stage: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(stage_message(stage));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_item(&self, processed: usize, current_path: &str) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            let name = current_path.rsplit(['/', '\\']).next().unwrap_or(current_path);
            pb.set_message(format!("{} files — {}", processed, name));
        }
    }

    fn on_stage_complete(&self, stage: &str, items: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m {} complete: {} items in {:.2}s",
            stage, items, duration_secs
        );
    }
}
