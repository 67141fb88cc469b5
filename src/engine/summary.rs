// src/engine/summary.rs

use std::fmt;
use std::path::PathBuf;

/// Final accounting of a build.
///
/// Each list keeps the order in which outcomes were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub compiled: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl BuildSummary {
    /// A build fails exactly when at least one file failed to compile.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.compiled.len() + self.failed.len() + self.skipped.len()
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} compiled, {} failed, {} skipped",
            self.compiled.len(),
            self.failed.len(),
            self.skipped.len()
        )?;
        for file in &self.failed {
            write!(f, "\n  failed:  {}", file.display())?;
        }
        for file in &self.skipped {
            write!(f, "\n  skipped: {}", file.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_failed_and_skipped_files() {
        let summary = BuildSummary {
            compiled: vec![PathBuf::from("a.tex")],
            failed: vec![PathBuf::from("b.tex")],
            skipped: vec![PathBuf::from("d.tex")],
        };
        assert!(!summary.is_success());
        assert_eq!(summary.total(), 3);
        assert_eq!(
            summary.to_string(),
            "1 compiled, 1 failed, 1 skipped\n  failed:  b.tex\n  skipped: d.tex"
        );
    }

    #[test]
    fn skips_alone_do_not_fail_a_build() {
        let summary = BuildSummary {
            skipped: vec![PathBuf::from("x.tex")],
            ..Default::default()
        };
        assert!(summary.is_success());
    }
}
