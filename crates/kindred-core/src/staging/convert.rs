use crate::config::ExclusionPolicy;
use crate::error::Error;
use crate::progress::ProgressReporter;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error, info};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct ConvertStats {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Convert every non-excluded file under `source` to ODT via a headless
/// LibreOffice subprocess, mirroring the directory structure under `target`.
///
/// Resumable: a file whose `<stem>.odt` target already exists is skipped.
/// Subprocess failures and missing outputs are logged, counted as failed,
/// and never abort the stage.
pub fn convert_corpus(
    source: &Path,
    target: &Path,
    soffice: &Path,
    policy: &ExclusionPolicy,
    reporter: &dyn ProgressReporter,
) -> Result<ConvertStats, Error> {
    if !source.is_dir() {
        return Err(Error::NotFound(source.to_path_buf()));
    }
    // A bare executable name is resolved through PATH; only an explicit
    // path can be checked up front.
    if soffice.components().count() > 1 && !soffice.exists() {
        return Err(Error::NotFound(soffice.to_path_buf()));
    }
    fs::create_dir_all(target)?;

    let mut stats = ConvertStats::default();

    let walker = WalkDir::new(source).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !(policy.excludes_folder(&name) || policy.excludes_path(entry.path()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if policy.excludes_file(&name) || policy.excludes_path(path) {
            debug!("Excluded from conversion: {}", path.display());
            continue;
        }

        let rel = match path.strip_prefix(source) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target_dir = match rel.parent() {
            Some(parent) if parent.components().next().is_some() => target.join(parent),
            _ => target.to_path_buf(),
        };
        // Only the final extension is replaced: `a.b.doc` becomes `a.b.odt`,
        // matching how the converter names its output.
        let stem = match rel.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        let target_file = target_dir.join(format!("{}.odt", stem));

        if target_file.exists() {
            debug!("Already converted, skipping: {}", target_file.display());
            stats.skipped += 1;
            continue;
        }
        fs::create_dir_all(&target_dir)?;

        match run_soffice(soffice, path, &target_dir) {
            Ok(()) if target_file.is_file() => {
                stats.converted += 1;
                reporter.on_item(stats.converted, &path.to_string_lossy());
            }
            Ok(()) => {
                error!(
                    "Converter produced no output for '{}', expected {}",
                    path.display(),
                    target_file.display()
                );
                stats.failed += 1;
            }
            Err(e) => {
                error!("Error converting '{}': {}", path.display(), e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Converted {} files into {} ({} already present, {} failed)",
        stats.converted,
        target.display(),
        stats.skipped,
        stats.failed
    );
    Ok(stats)
}

fn run_soffice(soffice: &Path, file: &Path, outdir: &Path) -> std::io::Result<()> {
    let output = Command::new(soffice)
        .arg("--headless")
        .arg("--convert-to")
        .arg("odt")
        .arg(file)
        .arg("--outdir")
        .arg(outdir)
        .output()?;

    if !output.status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!(
                "soffice exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }
    Ok(())
}
