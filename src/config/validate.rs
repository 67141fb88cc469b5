// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BakeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BakeError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        normalize_extensions(&mut raw);
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.build, raw.compile))
    }
}

/// Accept `".tex"` as well as `"tex"`.
fn normalize_extensions(cfg: &mut RawConfigFile) {
    let strip = |s: &mut String| {
        *s = s.trim().trim_start_matches('.').to_string();
    };
    strip(&mut cfg.build.source_extension);
    strip(&mut cfg.build.output_extension);
    for ext in cfg.compile.intermediate_extensions.iter_mut() {
        strip(ext);
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_extensions(cfg)?;
    validate_exclude_patterns(cfg)?;
    validate_compile_section(cfg)?;
    Ok(())
}

fn validate_extensions(cfg: &RawConfigFile) -> Result<()> {
    let build = &cfg.build;

    if build.source_extension.is_empty() {
        return Err(BakeError::ConfigError(
            "[build].source_extension must not be empty".to_string(),
        ));
    }
    if build.output_extension.is_empty() {
        return Err(BakeError::ConfigError(
            "[build].output_extension must not be empty".to_string(),
        ));
    }
    if build.source_extension == build.output_extension {
        return Err(BakeError::ConfigError(format!(
            "[build].source_extension and output_extension must differ (both are '{}')",
            build.source_extension
        )));
    }
    if cfg
        .compile
        .intermediate_extensions
        .iter()
        .any(|e| *e == build.source_extension)
    {
        return Err(BakeError::ConfigError(format!(
            "[compile].intermediate_extensions must not contain the source extension '{}'",
            build.source_extension
        )));
    }
    Ok(())
}

fn validate_exclude_patterns(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.build.exclude.iter() {
        if let Err(e) = Glob::new(pat) {
            return Err(BakeError::ConfigError(format!(
                "[build].exclude has invalid glob pattern '{}': {}",
                pat, e
            )));
        }
    }
    Ok(())
}

fn validate_compile_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.compile.cmd.trim().is_empty() {
        return Err(BakeError::ConfigError(
            "[compile].cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_dots_are_stripped_from_extensions() {
        let mut raw = RawConfigFile::default();
        raw.build.source_extension = ".tex".to_string();
        raw.build.output_extension = ".html".to_string();

        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(cfg.build().source_extension, "tex");
        assert_eq!(cfg.build().output_extension, "html");
    }

    #[test]
    fn identical_source_and_output_extension_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.build.output_extension = "tex".to_string();

        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, BakeError::ConfigError(msg) if msg.contains("must differ")));
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.build.exclude = vec!["a/[".to_string()];

        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, BakeError::ConfigError(msg) if msg.contains("invalid glob")));
    }
}
