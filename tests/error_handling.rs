// tests/error_handling.rs

mod common;
use crate::common::init_tracing;

use std::fs;
use std::path::{Path, PathBuf};

use texbake::config::{find_repository_root, load_and_validate};
use texbake::errors::BakeError;
use texbake::fs::mock::MockFileSystem;
use texbake::fs::RealFileSystem;
use texbake::load_settings;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("Bake.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[build\njobs = 2");
    assert!(matches!(load_and_validate(&path), Err(BakeError::TomlError(_))));
}

#[test]
fn invalid_exclude_glob_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[build]\nexclude = [\"a/[b\"]\n");
    match load_and_validate(&path) {
        Err(BakeError::ConfigError(msg)) => assert!(msg.contains("a/[b"), "message: {msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn identical_source_and_output_extensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[build]\nsource_extension = \"tex\"\noutput_extension = \".tex\"\n",
    );
    assert!(matches!(load_and_validate(&path), Err(BakeError::ConfigError(_))));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Bake.toml");
    assert!(matches!(load_and_validate(&path), Err(BakeError::IoError(_))));
}

#[test]
fn repository_root_is_found_by_walking_up() {
    let fs = MockFileSystem::new();
    fs.add_file("/work/Bake.toml", "");
    fs.add_file("/work/book/part/ch.tex", "");

    let root = find_repository_root(&fs, Path::new("/work/book/part")).unwrap();
    assert_eq!(root, PathBuf::from("/work"));
}

#[test]
fn git_directory_also_marks_the_root() {
    let fs = MockFileSystem::new();
    fs.add_file("/work/.git/HEAD", "ref: refs/heads/main");
    fs.add_file("/work/book/ch.tex", "");

    let root = find_repository_root(&fs, Path::new("/work/book")).unwrap();
    assert_eq!(root, PathBuf::from("/work"));
}

#[test]
fn no_marker_means_repository_not_found() {
    let fs = MockFileSystem::new();
    fs.add_file("/loose/ch.tex", "");

    match find_repository_root(&fs, Path::new("/loose")) {
        Err(BakeError::RepositoryNotFound(path)) => assert_eq!(path, PathBuf::from("/loose")),
        other => panic!("expected RepositoryNotFound, got {other:?}"),
    }
}

#[test]
fn jobs_come_from_flag_then_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[build]\njobs = 3\n");

    let from_config = load_settings(&RealFileSystem, dir.path(), None).unwrap();
    assert_eq!(from_config.workers, 3);

    let from_flag = load_settings(&RealFileSystem, dir.path(), Some(5)).unwrap();
    assert_eq!(from_flag.workers, 5);

    let non_positive = load_settings(&RealFileSystem, dir.path(), Some(-2)).unwrap();
    assert_eq!(non_positive.workers, 3);
}

#[test]
fn cycle_error_names_every_file() {
    let err = BakeError::DependencyCycle {
        files: vec![PathBuf::from("a.tex"), PathBuf::from("b.tex")],
    };
    assert_eq!(err.to_string(), "Dependency cycle detected among: a.tex, b.tex");
}
