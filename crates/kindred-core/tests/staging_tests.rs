use std::fs;
use tempfile::tempdir;

use kindred_core::staging::stage_corpus;
use kindred_core::{Error, SilentReporter};

#[test]
fn test_stage_corpus_preserves_structure() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();

    fs::create_dir_all(src.path().join("disk_a/docs")).unwrap();
    fs::write(src.path().join("disk_a/docs/letter.wpd"), "legacy bytes").unwrap();
    fs::write(src.path().join("readme.txt"), "top level").unwrap();

    let target = dst.path().join("0-corpus");
    let stats = stage_corpus(src.path(), &target, &SilentReporter).unwrap();

    assert_eq!(stats.copied, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(
        fs::read_to_string(target.join("disk_a/docs/letter.wpd")).unwrap(),
        "legacy bytes"
    );
    assert!(target.join("readme.txt").is_file());

    // Originals untouched.
    assert!(src.path().join("disk_a/docs/letter.wpd").is_file());
}

#[test]
fn test_stage_missing_source_is_not_found() {
    let dst = tempdir().unwrap();
    let missing = dst.path().join("does-not-exist");

    let err = stage_corpus(&missing, &dst.path().join("0-corpus"), &SilentReporter).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
