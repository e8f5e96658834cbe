use std::fs;
use std::path::Path;
use tempfile::tempdir;

use kindred_core::hasher::{AlwaysHashRaw, AlwaysSkip};
use kindred_core::{AppConfig, Error, Pipeline, SilentReporter};

fn pipeline_for(working_dir: &Path) -> Pipeline {
    Pipeline::new(AppConfig {
        working_dir: working_dir.to_string_lossy().into_owned(),
        ..Default::default()
    })
}

/// Write text files into `<working-dir>/1-extract`, creating parents.
/// Paths are collection-relative, e.g. `disk_a/letter.odt`.
fn write_extract_tree(working_dir: &Path, files: &[(&str, &str)]) {
    let extract = working_dir.join("1-extract");
    for (rel, content) in files {
        let path = extract.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[test]
fn test_full_pipeline_two_disks() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    // disk_a: {alpha, beta}; disk_b: {alpha} → d=1, n_max=2, similarity 0.5
    write_extract_tree(
        tmp.path(),
        &[
            ("disk_a/letter.odt", "alpha content"),
            ("disk_a/notes.odt", "beta content"),
            ("disk_b/letter.odt", "alpha content"),
        ],
    );

    let hash = pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    assert_eq!(hash.collections, 2);
    assert_eq!(hash.pairs, 3);
    assert!(hash.table.is_file());

    let presence = pipeline.build_presence(&SilentReporter).unwrap();
    assert_eq!(presence.fingerprints, 2);
    assert_eq!(presence.collections, 2);

    let similarity = pipeline.compute_similarity(&SilentReporter).unwrap();
    assert_eq!(similarity.collections, 2);

    let table = fs::read_to_string(similarity.table).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next().unwrap(), "Folder,disk_a,disk_b");
    assert_eq!(lines.next().unwrap(), "disk_a,1.000000,0.500000");
    assert_eq!(lines.next().unwrap(), "disk_b,0.500000,1.000000");
}

#[test]
fn test_collection_is_first_path_segment() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(
        tmp.path(),
        &[("disk_b/archive/1998/deep.odt", "buried report")],
    );

    pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();

    let relation = fs::read_to_string(pipeline.layout().relation_table()).unwrap();
    let mut lines = relation.lines();
    assert_eq!(lines.next().unwrap(), "Folder,Hash");
    let row = lines.next().unwrap();
    assert!(row.starts_with("disk_b,"), "unexpected row: {}", row);
    assert!(!relation.contains("archive"));
}

#[test]
fn test_declined_binary_file_contributes_nothing() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(tmp.path(), &[("disk_a/letter.odt", "readable text")]);
    fs::write(
        tmp.path().join("1-extract/disk_a/raw.bin"),
        [0x80u8, 0xFF, 0x00, 0x9C],
    )
    .unwrap();

    let declined = pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    assert_eq!(declined.pairs, 1);

    let approved = pipeline
        .extract_hashes(&AlwaysHashRaw, &SilentReporter)
        .unwrap();
    assert_eq!(approved.pairs, 2);
}

#[test]
fn test_excluded_artifacts_are_ignored() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(
        tmp.path(),
        &[
            ("disk_a/letter.odt", "real document"),
            ("disk_a/.DS_Store", "finder noise"),
            ("disk_a/FAT1", "allocation table"),
            ("disk_a/__MACOSX/letter.odt", "resource fork copy"),
            ("disk_a/scratch.tmp", "editor leftovers"),
        ],
    );

    let hash = pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    assert_eq!(hash.pairs, 1);
}

#[test]
fn test_missing_extract_dir_is_not_found() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    let err = pipeline
        .extract_hashes(&AlwaysSkip, &SilentReporter)
        .unwrap_err();
    match err {
        Error::NotFound(path) => assert!(path.ends_with("1-extract")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_empty_relation_aborts_presence_stage() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    // A collection folder with no files yields a header-only relation.
    fs::create_dir_all(tmp.path().join("1-extract/disk_a")).unwrap();
    let hash = pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    assert_eq!(hash.pairs, 0);

    let err = pipeline.build_presence(&SilentReporter).unwrap_err();
    assert!(matches!(err, Error::EmptyInput(_)));
    assert!(
        !pipeline.layout().presence_table().exists(),
        "no presence table may be written for an empty relation"
    );
}

#[test]
fn test_presence_table_is_deterministic() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(
        tmp.path(),
        &[
            ("disk_c/one.odt", "first"),
            ("disk_a/two.odt", "second"),
            ("disk_b/three.odt", "third"),
            ("disk_b/four.odt", "first"),
        ],
    );

    pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    pipeline.build_presence(&SilentReporter).unwrap();
    let first = fs::read(pipeline.layout().presence_table()).unwrap();

    pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    pipeline.build_presence(&SilentReporter).unwrap();
    let second = fs::read(pipeline.layout().presence_table()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_line_ending_variants_count_as_same_content() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(
        tmp.path(),
        &[
            ("disk_a/letter.odt", "same text\nsecond line\n"),
            ("disk_b/letter.odt", "same text\r\nsecond line\r\n"),
        ],
    );

    pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    let presence = pipeline.build_presence(&SilentReporter).unwrap();
    assert_eq!(presence.fingerprints, 1);

    pipeline.compute_similarity(&SilentReporter).unwrap();
    let table = fs::read_to_string(pipeline.layout().similarity_table()).unwrap();
    assert!(table.contains("disk_a,1.000000,1.000000"));
}

#[test]
fn test_tampered_presence_cell_rejected_before_similarity() {
    let tmp = tempdir().unwrap();
    let pipeline = pipeline_for(tmp.path());

    write_extract_tree(
        tmp.path(),
        &[
            ("disk_a/letter.odt", "alpha"),
            ("disk_b/letter.odt", "beta"),
        ],
    );
    pipeline.extract_hashes(&AlwaysSkip, &SilentReporter).unwrap();
    pipeline.build_presence(&SilentReporter).unwrap();

    // Simulate a hand-edited matrix with an out-of-range cell.
    let path = pipeline.layout().presence_table();
    let tampered = fs::read_to_string(&path).unwrap().replacen(",0", ",2", 1);
    fs::write(&path, tampered).unwrap();

    let err = pipeline.compute_similarity(&SilentReporter).unwrap_err();
    assert!(matches!(err, Error::InvalidMatrix(_)));
    assert!(
        !pipeline.layout().similarity_table().exists(),
        "no similarity table may be written for an invalid matrix"
    );
}
