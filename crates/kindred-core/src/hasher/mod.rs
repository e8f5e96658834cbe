use crate::config::ExclusionPolicy;
use crate::error::Error;
use crate::progress::ProgressReporter;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Ordered collection → fingerprint-set mapping. Ordered containers keep the
/// serialized relation byte-identical across runs on the same input.
pub type FingerprintSets = BTreeMap<String, BTreeSet<String>>;

/// Outcome of the caller's decision for a file that is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFileDecision {
    /// Fingerprint the raw bytes as-is.
    HashRaw,
    /// Leave the file out of its collection's fingerprint set.
    Skip,
}

/// Strategy consulted when a file fails UTF-8 decoding.
///
/// The extractor suspends that one file until the strategy answers; the CLI
/// implements this with an interactive prompt, batch runs use a fixed policy.
pub trait DecideBinary {
    fn decide(&self, file: &Path) -> BinaryFileDecision;
}

/// Batch default: undecodable files contribute nothing.
pub struct AlwaysSkip;

impl DecideBinary for AlwaysSkip {
    fn decide(&self, _file: &Path) -> BinaryFileDecision {
        BinaryFileDecision::Skip
    }
}

/// Fingerprint every undecodable file over its raw bytes without asking.
pub struct AlwaysHashRaw;

impl DecideBinary for AlwaysHashRaw {
    fn decide(&self, _file: &Path) -> BinaryFileDecision {
        BinaryFileDecision::HashRaw
    }
}

/// Walk `root` and fingerprint every regular file not excluded by `policy`,
/// grouping fingerprints by top-level collection (first path segment under
/// `root`). Unreadable files are logged and skipped; undecodable files go
/// through `decider`. Duplicate fingerprints within a collection collapse.
pub fn extract_fingerprints(
    root: &Path,
    policy: &ExclusionPolicy,
    decider: &dyn DecideBinary,
    reporter: &dyn ProgressReporter,
) -> Result<FingerprintSets, Error> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let mut sets: FingerprintSets = BTreeMap::new();
    let mut processed = 0usize;

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if policy.excludes_folder(&name) || policy.excludes_path(entry.path()) {
            debug!("Excluded folder: {}", entry.path().display());
            return false;
        }
        true
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if policy.excludes_file(&name) || policy.excludes_path(path) {
            debug!("Excluded file: {}", path.display());
            continue;
        }

        // First path segment relative to root is the collection key,
        // regardless of deeper nesting.
        let collection = match path
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.components().next())
            .filter(|_| entry.depth() > 1)
        {
            Some(first) => first.as_os_str().to_string_lossy().into_owned(),
            None => {
                warn!(
                    "File outside any collection, skipping: {}",
                    path.display()
                );
                continue;
            }
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Error reading '{}', skipping: {}", path.display(), e);
                continue;
            }
        };

        let fingerprint = match String::from_utf8(bytes) {
            Ok(text) => Some(text_fingerprint(&text)),
            Err(e) => match decider.decide(path) {
                BinaryFileDecision::HashRaw => Some(raw_fingerprint(&e.into_bytes())),
                BinaryFileDecision::Skip => {
                    debug!("Binary hashing declined for: {}", path.display());
                    None
                }
            },
        };

        if let Some(fingerprint) = fingerprint {
            sets.entry(collection).or_default().insert(fingerprint);
            processed += 1;
            reporter.on_item(processed, &path.to_string_lossy());
        }
    }

    Ok(sets)
}

/// Fingerprint of decoded text content: newline-normalized, re-encoded as
/// UTF-8. CRLF and LF renditions of the same text hash identically; the
/// result may therefore differ from the raw-byte fingerprint of the same
/// file. That asymmetry is intended.
pub fn text_fingerprint(text: &str) -> String {
    blake3::hash(normalize_newlines(text).as_bytes())
        .to_hex()
        .to_string()
}

/// Fingerprint of raw bytes, for files the caller approved as binary.
pub fn raw_fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_idempotence() {
        let a = text_fingerprint("the quick brown fox");
        let b = text_fingerprint("the quick brown fox");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a, a.to_lowercase());
    }

    #[test]
    fn test_line_endings_normalize_in_text_mode() {
        let unix = text_fingerprint("line one\nline two\n");
        let dos = text_fingerprint("line one\r\nline two\r\n");
        let mac = text_fingerprint("line one\rline two\r");
        assert_eq!(unix, dos);
        assert_eq!(unix, mac);
    }

    #[test]
    fn test_text_and_raw_modes_differ_on_crlf_bytes() {
        let bytes = b"line one\r\nline two\r\n";
        let text = std::str::from_utf8(bytes).unwrap();
        assert_ne!(text_fingerprint(text), raw_fingerprint(bytes));
    }

    #[test]
    fn test_text_and_raw_modes_agree_on_plain_ascii() {
        let bytes = b"no carriage returns here\n";
        let text = std::str::from_utf8(bytes).unwrap();
        assert_eq!(text_fingerprint(text), raw_fingerprint(bytes));
    }
}
