// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{CONFIG_FILE_NAME, ConfigFile, RawConfigFile};
use crate::errors::{BakeError, Result};
use crate::fs::FileSystem;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `<root>/Bake.toml` if present, otherwise fall back to defaults.
pub fn load_for_root(root: &Path) -> Result<ConfigFile> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        debug!(path = %path.display(), "loading build configuration");
        load_and_validate(&path)
    } else {
        debug!(root = %root.display(), "no {} found; using defaults", CONFIG_FILE_NAME);
        Ok(ConfigFile::default())
    }
}

/// Walk up from `start` until a directory containing `Bake.toml` or `.git`
/// is found.
pub fn find_repository_root(fs: &dyn FileSystem, start: &Path) -> Result<PathBuf> {
    let start = fs.canonicalize(start)?;
    let mut dir = start.as_path();

    loop {
        debug!(dir = %dir.display(), "checking for repository root");
        if fs.is_file(&dir.join(CONFIG_FILE_NAME)) || fs.exists(&dir.join(".git")) {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => return Err(BakeError::RepositoryNotFound(start.clone())),
        }
    }
}
