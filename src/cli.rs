// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `texbake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "texbake",
    version,
    about = "Incrementally compile the TeX documents of a repository.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory inside the repository. The root is found by walking up to
    /// the nearest `Bake.toml` or `.git`.
    #[arg(short = 'r', long, value_name = "PATH", default_value = ".", global = true)]
    pub repository: PathBuf,

    /// Number of concurrent compile jobs. Zero or negative uses the
    /// configured or built-in default.
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        allow_negative_numbers = true,
        global = true
    )]
    pub jobs: Option<i64>,

    /// Shorthand for `--log-level debug`.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Disable colored log output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TEXBAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compile every document that is out of date, in dependency order.
    #[command(visible_alias = "b")]
    Bake {
        /// Print the build plan without compiling anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the documents that need compiling and their dirty dependencies.
    #[command(visible_alias = "i")]
    Info,

    /// Compile a single document, ignoring staleness and dependencies.
    #[command(visible_alias = "c")]
    Compile {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Remove built and intermediate files.
    Clean {
        /// Path inside the repository; defaults to the whole repository.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
