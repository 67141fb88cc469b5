// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod stale;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{find_repository_root, load_for_root, BuildSettings};
use crate::dag::{BuildPlan, Planner, Scheduler};
use crate::deps::path_utils::relative_str;
use crate::deps::{list_candidate_files, TexDependencyExtractor};
use crate::engine::{BuildRuntime, BuildSummary, LogProgress, ProgressReporter, RuntimeOptions};
use crate::errors::{BakeError, Result};
use crate::exec::{remove_built_files, CommandCompiler, Compiler};
use crate::fs::{FileSystem, RealFileSystem};
use crate::stale::MetadataOracle;

/// High-level entry point used by `main.rs`.
///
/// Returns `Ok(false)` when the command ran but some document failed to
/// compile.
pub async fn run(args: CliArgs) -> Result<bool> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let settings = load_settings(fs.as_ref(), &args.repository, args.jobs)?;

    match args.command {
        Command::Bake { dry_run: true } => {
            let plan = plan_build(Arc::clone(&fs), &settings)?;
            print_plan(&plan, &settings.root);
            Ok(true)
        }
        Command::Bake { dry_run: false } => {
            let compiler = Arc::new(CommandCompiler::new(Arc::clone(&fs), settings.clone()));
            let mut progress = LogProgress::new();
            let summary = bake_with(fs, &settings, compiler, &mut progress).await?;
            println!("{}", summary_report(&summary, &settings.root));
            Ok(summary.is_success())
        }
        Command::Info => {
            let plan = plan_build(fs, &settings)?;
            print_plan(&plan, &settings.root);
            Ok(true)
        }
        Command::Compile { file } => compile_one(fs, &settings, &file).await,
        Command::Clean { path } => {
            let path = path.unwrap_or_else(|| settings.root.clone());
            let target = if path.is_absolute() {
                path
            } else {
                std::env::current_dir()?.join(path)
            };
            let target = fs.canonicalize(&target).unwrap_or(target);
            let removed = remove_built_files(fs.as_ref(), &settings, &target)?;
            println!("removed {removed} file(s)");
            Ok(true)
        }
    }
}

/// Locate the repository containing `start`, read its `Bake.toml` and
/// resolve the worker count.
pub fn load_settings(
    fs: &dyn FileSystem,
    start: &Path,
    cli_jobs: Option<i64>,
) -> Result<BuildSettings> {
    let root = find_repository_root(fs, start)?;
    let config = load_for_root(&root)?;
    let settings = BuildSettings::new(root, cli_jobs, config);
    debug!(root = %settings.root.display(), workers = settings.workers, "settings resolved");
    Ok(settings)
}

/// List candidates, extract their dependencies and decide what to build.
pub fn plan_build(fs: Arc<dyn FileSystem>, settings: &BuildSettings) -> Result<BuildPlan> {
    let candidates = list_candidate_files(fs.as_ref(), settings)?;
    info!(candidates = candidates.len(), "listed candidate documents");

    let extractor = TexDependencyExtractor::new(Arc::clone(&fs), settings.source_extension());
    let oracle = MetadataOracle::new(fs, settings.root.clone(), settings.source_extension());
    let planner = Planner::new(
        &extractor,
        &oracle,
        settings.config.build().output_extension.as_str(),
    );
    planner.plan(&candidates)
}

/// Plan and run a build with the given compiler and progress reporter.
pub async fn bake_with(
    fs: Arc<dyn FileSystem>,
    settings: &BuildSettings,
    compiler: Arc<dyn Compiler>,
    progress: &mut dyn ProgressReporter,
) -> Result<BuildSummary> {
    let plan = plan_build(fs, settings)?;
    let scheduler = Scheduler::from_plan(&plan);
    let options = RuntimeOptions {
        workers: settings.workers,
    };
    BuildRuntime::new(scheduler, compiler, settings.root.clone(), options)
        .run(progress)
        .await
}

/// Plan and run a build on the real filesystem with the configured command.
pub async fn bake(settings: &BuildSettings) -> Result<BuildSummary> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let compiler = Arc::new(CommandCompiler::new(Arc::clone(&fs), settings.clone()));
    let mut progress = LogProgress::new();
    bake_with(fs, settings, compiler, &mut progress).await
}

/// Compile a single document without consulting staleness or scheduling.
pub async fn compile_one(
    fs: Arc<dyn FileSystem>,
    settings: &BuildSettings,
    file: &Path,
) -> Result<bool> {
    let file = fs
        .canonicalize(file)
        .map_err(|e| BakeError::ConfigError(format!("cannot compile {:?}: {e}", file)))?;
    if !file.starts_with(&settings.root) {
        return Err(BakeError::ConfigError(format!(
            "{:?} is outside the repository {:?}",
            file, settings.root
        )));
    }

    let compiler = CommandCompiler::new(fs, settings.clone());
    match compiler.compile(&settings.root, &file).await {
        Ok(output) => {
            debug!(bytes = output.len(), "compiler output captured");
            println!("compiled {}", display_relative(&settings.root, &file));
            Ok(true)
        }
        Err(err) => {
            eprintln!("{err:#}");
            println!("failed {}", display_relative(&settings.root, &file));
            Ok(false)
        }
    }
}

fn display_relative(root: &Path, file: &Path) -> String {
    relative_str(root, file).unwrap_or_else(|| file.display().to_string())
}

/// Human-readable plan: one line per document, build order, with its dirty
/// dependencies.
pub fn plan_report(plan: &BuildPlan, root: &Path) -> String {
    let mut out = format!(
        "{} of {} document(s) need compiling",
        plan.len(),
        plan.candidates
    );
    for file in &plan.order {
        out.push_str(&format!("\n  {}", display_relative(root, file)));
        let deps = plan.dependencies_of(file);
        if !deps.is_empty() {
            let names: Vec<String> = deps.iter().map(|d| display_relative(root, d)).collect();
            out.push_str(&format!("  (after {})", names.join(", ")));
        }
    }
    out
}

fn print_plan(plan: &BuildPlan, root: &Path) {
    println!("{}", plan_report(plan, root));
}

/// [`BuildSummary`] with paths shown relative to the repository root.
pub fn summary_report(summary: &BuildSummary, root: &Path) -> String {
    let relative = |files: &[PathBuf]| -> Vec<PathBuf> {
        files
            .iter()
            .map(|f| PathBuf::from(display_relative(root, f)))
            .collect()
    };
    BuildSummary {
        compiled: relative(&summary.compiled),
        failed: relative(&summary.failed),
        skipped: relative(&summary.skipped),
    }
    .to_string()
}
