// tests/staleness.rs

mod common;
use crate::common::init_tracing;

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use texbake::fs::RealFileSystem;
use texbake::stale::{is_up_to_date_by_time, stamp_dependencies, MetadataOracle, StalenessOracle};

fn write_at(path: &Path, contents: &str, time: SystemTime) {
    fs::write(path, contents).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs)
}

#[test]
fn modification_time_rule() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.tex");
    let output = dir.path().join("doc.html");
    let fs = RealFileSystem;

    write_at(&input, "x", at(10));
    assert!(!is_up_to_date_by_time(&fs, &input, &output), "missing output is stale");

    write_at(&output, "y", at(20));
    assert!(is_up_to_date_by_time(&fs, &input, &output));

    write_at(&input, "x", at(20));
    assert!(is_up_to_date_by_time(&fs, &input, &output), "equal times are current");

    write_at(&input, "x", at(30));
    assert!(!is_up_to_date_by_time(&fs, &input, &output));

    fs::remove_file(&input).unwrap();
    assert!(is_up_to_date_by_time(&fs, &input, &output), "missing input is infinitely old");
}

#[test]
fn recorded_hashes_win_over_modification_times() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let doc = root.join("doc.tex");
    let chapter = root.join("chapter.tex");
    let output = root.join("doc.html");

    write_at(&chapter, "chapter one", at(1));
    write_at(&output, "<html><head></head><body></body></html>", at(2));
    let stamped = stamp_dependencies(&RealFileSystem, root, &output, &[chapter.clone(), doc.clone()]);
    // doc.tex does not exist yet, so only the chapter is recorded.
    assert_eq!(stamped.unwrap(), 1);

    write_at(&doc, "\\input{chapter}", at(100));
    let stamped = stamp_dependencies(&RealFileSystem, root, &output, &[chapter.clone(), doc.clone()]);
    assert_eq!(stamped.unwrap(), 2);
    File::options().write(true).open(&output).unwrap().set_modified(at(50)).unwrap();

    let oracle = MetadataOracle::new(Arc::new(RealFileSystem), root.to_path_buf(), "tex");

    // The source is newer than its output, but nothing it recorded changed.
    assert!(oracle.is_up_to_date(&doc, &output).unwrap());

    write_at(&chapter, "chapter one, revised", at(3));
    assert!(!oracle.is_up_to_date(&doc, &output).unwrap());
}

#[test]
fn vanished_dependencies_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let doc = root.join("doc.tex");
    let figure = root.join("figure.tex");
    let output = root.join("doc.html");

    write_at(&doc, "body", at(1));
    write_at(&figure, "figure", at(1));
    write_at(&output, "<html><head></head></html>", at(2));
    stamp_dependencies(&RealFileSystem, root, &output, &[doc.clone(), figure.clone()]).unwrap();

    fs::remove_file(&figure).unwrap();

    let oracle = MetadataOracle::new(Arc::new(RealFileSystem), root.to_path_buf(), "tex");
    assert!(oracle.is_up_to_date(&doc, &output).unwrap());
}

#[test]
fn missing_output_is_always_stale() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.tex");
    write_at(&doc, "body", at(1));

    let oracle = MetadataOracle::new(Arc::new(RealFileSystem), dir.path().to_path_buf(), "tex");
    assert!(!oracle.is_up_to_date(&doc, &dir.path().join("doc.html")).unwrap());
}

#[test]
fn output_without_metadata_falls_back_to_times() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.tex");
    let output = dir.path().join("doc.html");
    write_at(&doc, "body", at(5));
    write_at(&output, "<html></html>", at(6));

    let oracle = MetadataOracle::new(Arc::new(RealFileSystem), dir.path().to_path_buf(), "tex");
    assert!(oracle.is_up_to_date(&doc, &output).unwrap());

    write_at(&doc, "body changed", at(7));
    assert!(!oracle.is_up_to_date(&doc, &output).unwrap());
}
