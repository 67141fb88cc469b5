// src/config/mod.rs

//! Configuration loading and validation for texbake.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load `Bake.toml` and locate the repository root (`loader.rs`).
//! - Validate extensions, globs and the compile command (`validate.rs`).
//! - Resolve the effective per-build settings (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{find_repository_root, load_and_validate, load_for_root, load_from_path};
pub use model::{
    BuildSection, CompileSection, ConfigFile, RawConfigFile, CONFIG_FILE_NAME,
    DEFAULT_INTERMEDIATE_EXTENSIONS,
};
pub use settings::{BuildSettings, DEFAULT_WORKERS};
