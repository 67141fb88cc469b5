#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use texbake::config::{BuildSettings, ConfigFile, RawConfigFile};
use texbake::dag::{BuildPlan, Scheduler};

/// Builder for a [`BuildPlan`], so scheduler and runtime tests can skip the
/// planner.
///
/// Files are added in build order; dependencies are given by name.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    order: Vec<PathBuf>,
    dependencies: HashMap<PathBuf, Vec<PathBuf>>,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with no dependencies.
    pub fn file(self, name: &str) -> Self {
        self.file_after(name, &[])
    }

    /// Add a file that depends on `deps`.
    pub fn file_after(mut self, name: &str, deps: &[&str]) -> Self {
        let path = PathBuf::from(name);
        self.order.push(path.clone());
        self.dependencies
            .insert(path, deps.iter().map(PathBuf::from).collect());
        self
    }

    pub fn build(self) -> BuildPlan {
        BuildPlan {
            candidates: self.order.len(),
            order: self.order,
            dependencies: self.dependencies,
        }
    }

    pub fn scheduler(self) -> Scheduler {
        Scheduler::from_plan(&self.build())
    }
}

/// `A`; `B` and `C` after `A`; `D` after `B` and `C`.
pub fn diamond() -> PlanBuilder {
    PlanBuilder::new()
        .file("A")
        .file_after("B", &["A"])
        .file_after("C", &["A"])
        .file_after("D", &["B", "C"])
}

/// Builder for [`BuildSettings`] backed by a validated config.
pub struct SettingsBuilder {
    root: PathBuf,
    jobs: Option<i64>,
    config: RawConfigFile,
}

impl SettingsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            jobs: None,
            config: RawConfigFile::default(),
        }
    }

    pub fn jobs(mut self, jobs: i64) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.config.compile.cmd = cmd.to_string();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.build.exclude.push(pattern.to_string());
        self
    }

    pub fn build(self) -> BuildSettings {
        let config =
            ConfigFile::try_from(self.config).expect("Failed to build valid config from builder");
        BuildSettings::new(self.root, self.jobs, config)
    }
}
