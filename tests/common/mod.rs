#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use texbake_test_utils::builders;
pub use texbake_test_utils::fake_compiler::{CompileRecord, FakeCompiler};
pub use texbake_test_utils::{init_tracing, with_timeout};

use texbake::config::BuildSettings;
use texbake::deps::{DependencyExtractor, TexDependencyExtractor};
use texbake::fs::mock::MockFileSystem;
use texbake::fs::FileSystem;
use texbake::stale::stamp_dependencies;

pub const ROOT: &str = "/repo";

/// A minimal compilable document with `body` inside it.
pub fn tex_document(body: &str) -> String {
    format!("\\documentclass{{article}}\n\\begin{{document}}\n{body}\n\\end{{document}}\n")
}

pub fn repo_path(rel: &str) -> PathBuf {
    Path::new(ROOT).join(rel)
}

/// Mock repository: every `(relative path, content)` pair is written under
/// [`ROOT`] in order, so later files are newer.
pub fn mock_repo(files: &[(&str, &str)]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file(repo_path(".git/HEAD"), "ref: refs/heads/main");
    for (rel, content) in files {
        fs.add_file(repo_path(rel), *content);
    }
    fs
}

/// Do what a successful compile does to the filesystem: write the output and
/// stamp the hashes of the file and its dependencies into it.
pub fn fake_successful_compile(fs: &MockFileSystem, settings: &BuildSettings, file: &Path) {
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let extractor = TexDependencyExtractor::new(shared, settings.source_extension());
    let mut deps = extractor.dependencies(file).unwrap();
    deps.push(file.to_path_buf());

    let output = settings.output_path(file);
    fs.add_file(&output, "<html><head><title>x</title></head><body></body></html>");
    stamp_dependencies(fs, &settings.root, &output, &deps).unwrap();
}
