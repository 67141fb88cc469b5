// src/exec/compiler.rs

//! Compilation of a single document.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::BuildSettings;
use crate::deps::{DependencyExtractor, TexDependencyExtractor};
use crate::exec::clean::clean_intermediates;
use crate::fs::FileSystem;
use crate::stale::stamp_dependencies;

/// Boxed future returned by [`Compiler::compile`].
pub type CompileFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Black-box compilation of one file.
///
/// Any error is a failed outcome for that file; it never aborts the build.
/// Production code uses [`CommandCompiler`]; tests provide their own.
pub trait Compiler: Send + Sync {
    /// Compile `task`, returning the tool's captured output.
    fn compile<'a>(&'a self, root: &'a Path, task: &'a Path) -> CompileFuture<'a>;
}

/// Runs the configured `[compile].cmd` through the platform shell.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    fs: Arc<dyn FileSystem>,
    settings: BuildSettings,
    extractor: TexDependencyExtractor,
}

impl CommandCompiler {
    pub fn new(fs: Arc<dyn FileSystem>, settings: BuildSettings) -> Self {
        let extractor = TexDependencyExtractor::new(Arc::clone(&fs), settings.source_extension());
        Self {
            fs,
            settings,
            extractor,
        }
    }

    fn command_line(&self, file: &Path) -> Result<String> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("file name of {:?} is not valid UTF-8", file))?;
        let stem = file
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or(name);
        Ok(self
            .settings
            .config
            .compile()
            .cmd
            .replace("{file}", name)
            .replace("{stem}", stem))
    }

    async fn compile_file(&self, root: &Path, task: &Path) -> Result<Vec<u8>> {
        let file: PathBuf = if task.is_absolute() {
            task.to_path_buf()
        } else {
            root.join(task)
        };
        let dir = file
            .parent()
            .ok_or_else(|| anyhow!("{:?} has no parent directory", file))?;
        let intermediates = &self.settings.config.compile().intermediate_extensions;
        let fs = self.fs.as_ref();

        clean_intermediates(fs, &file, intermediates)?;

        let cmd_line = self.command_line(&file)?;
        info!(file = %file.display(), cmd = %cmd_line, "starting compiler");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&cmd_line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&cmd_line);
            c
        };

        let output = cmd
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawning compiler for {:?}", file))?;

        let mut captured = output.stdout;
        captured.extend_from_slice(&output.stderr);

        if !output.status.success() {
            if let Err(err) = clean_intermediates(fs, &file, intermediates) {
                warn!(file = %file.display(), error = %err, "cleanup after failed compile did not finish");
            }
            bail!(
                "`{}` exited with code {}:\n{}",
                cmd_line,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&captured)
            );
        }

        let built = self.settings.output_path(&file);
        if !fs.is_file(&built) {
            bail!("`{}` succeeded but did not produce {:?}", cmd_line, built);
        }

        let mut deps = match self.extractor.dependencies(&file) {
            Ok(deps) => deps,
            Err(err) => {
                warn!(file = %file.display(), error = %err, "could not extract dependencies for stamping");
                Vec::new()
            }
        };
        deps.push(file.clone());

        let stamped = stamp_dependencies(fs, root, &built, &deps)?;
        debug!(file = %built.display(), stamped, "recorded dependency hashes");

        Ok(captured)
    }
}

impl Compiler for CommandCompiler {
    fn compile<'a>(&'a self, root: &'a Path, task: &'a Path) -> CompileFuture<'a> {
        Box::pin(self.compile_file(root, task))
    }
}
