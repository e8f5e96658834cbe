use crate::error::Error;
use crate::progress::ProgressReporter;
use std::fs;
use std::path::Path;
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct StageStats {
    pub copied: usize,
    pub failed: usize,
}

/// Copy every regular file under `source` into `target`, preserving the
/// relative directory structure. Later stages only ever read the copy, so
/// the original media stays untouched. Per-file copy failures are logged
/// and skipped.
pub fn stage_corpus(
    source: &Path,
    target: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<StageStats, Error> {
    if !source.is_dir() {
        return Err(Error::NotFound(source.to_path_buf()));
    }
    fs::create_dir_all(target)?;

    let mut stats = StageStats::default();
    for entry in WalkDir::new(source) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Skipping unreadable entry: {}", e);
                stats.failed += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = match path.strip_prefix(source) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest = target.join(rel);

        if let Some(parent) = dest.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Error creating '{}': {}", parent.display(), e);
                stats.failed += 1;
                continue;
            }
        }
        match fs::copy(path, &dest) {
            Ok(_) => {
                stats.copied += 1;
                reporter.on_item(stats.copied, &path.to_string_lossy());
            }
            Err(e) => {
                error!("Error copying '{}': {}", path.display(), e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Staged corpus into {}: {} files copied, {} failed",
        target.display(),
        stats.copied,
        stats.failed
    );
    Ok(stats)
}
