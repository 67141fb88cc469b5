// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`compiler`] provides the `Compiler` trait and the shell-command
//!   `CommandCompiler` used in production; tests swap in a fake.
//! - [`worker`] runs the worker loop that feeds files to a compiler.
//! - [`clean`] removes intermediate and built files.

pub mod clean;
pub mod compiler;
pub mod worker;

pub use clean::{clean_intermediates, remove_built_files};
pub use compiler::{CommandCompiler, CompileFuture, Compiler};
