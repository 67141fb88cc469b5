// src/dag/planner.rs

//! Decides what needs compiling and in which order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dag::graph::DependencyGraph;
use crate::deps::DependencyExtractor;
use crate::errors::Result;
use crate::stale::StalenessOracle;

/// Output of planning: the dirty files in build order plus, per dirty file,
/// its dirty dependencies.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    /// Dirty files, each exactly once, dependencies before dependents.
    pub order: Vec<PathBuf>,
    /// Dirty file -> its dirty dependencies. Clean dependencies are omitted.
    pub dependencies: HashMap<PathBuf, Vec<PathBuf>>,
    /// Number of candidate files that were examined.
    pub candidates: usize,
}

impl BuildPlan {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn dependencies_of(&self, file: &Path) -> &[PathBuf] {
        self.dependencies
            .get(file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Builds a [`BuildPlan`] from a candidate list using a dependency extractor
/// and a staleness oracle.
pub struct Planner<'a> {
    extractor: &'a dyn DependencyExtractor,
    oracle: &'a dyn StalenessOracle,
    output_extension: String,
}

impl<'a> Planner<'a> {
    pub fn new(
        extractor: &'a dyn DependencyExtractor,
        oracle: &'a dyn StalenessOracle,
        output_extension: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            oracle,
            output_extension: output_extension.into(),
        }
    }

    /// Compute the plan for `candidates`, whose order fixes the order of
    /// discovery in the result.
    ///
    /// Fails with `DependencyCycle` if the dirty files depend on each other
    /// cyclically.
    pub fn plan(&self, candidates: &[PathBuf]) -> Result<BuildPlan> {
        let deps = self.extract_all(candidates);

        debug!("determining which files are up to date");
        let mut dirty: HashSet<PathBuf> = candidates
            .iter()
            .filter(|file| self.is_stale(file))
            .cloned()
            .collect();
        let initially_dirty = dirty.len();

        debug!("propagating dirt across dependencies");
        loop {
            let mut moved = false;
            for file in candidates {
                if dirty.contains(file) {
                    continue;
                }
                let dirty_dep = deps[file].iter().find(|d| dirty.contains(*d));
                if let Some(dep) = dirty_dep {
                    debug!(
                        file = %file.display(),
                        dependency = %dep.display(),
                        "marking dirty because a dependency is dirty"
                    );
                    dirty.insert(file.clone());
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        debug!("building dependency graph over dirty files");
        let mut graph = DependencyGraph::new();
        for file in candidates.iter().filter(|f| dirty.contains(*f)) {
            graph.add_node(file);
            for dep in deps[file].iter().filter(|d| dirty.contains(*d)) {
                graph.add_edge(file, dep);
            }
        }
        graph.ensure_acyclic()?;

        debug!("ordering dirty files topologically");
        let mut added: HashSet<PathBuf> = HashSet::new();
        let mut order = Vec::with_capacity(graph.len());
        for file in candidates.iter().filter(|f| dirty.contains(*f)) {
            for ordered in graph.topological_closure(file)? {
                if added.insert(ordered.clone()) {
                    order.push(ordered);
                }
            }
        }

        let dependencies = order
            .iter()
            .map(|file| (file.clone(), graph.dependencies_of(file).to_vec()))
            .collect();

        info!(
            candidates = candidates.len(),
            stale = initially_dirty,
            dirty = order.len(),
            "build plan ready"
        );

        Ok(BuildPlan {
            order,
            dependencies,
            candidates: candidates.len(),
        })
    }

    /// Extract each candidate's dependencies once. Extraction failures are
    /// treated as "no dependencies".
    fn extract_all(&self, candidates: &[PathBuf]) -> HashMap<PathBuf, Vec<PathBuf>> {
        candidates
            .iter()
            .map(|file| {
                let deps = match self.extractor.dependencies(file) {
                    Ok(deps) => deps,
                    Err(err) => {
                        warn!(
                            file = %file.display(),
                            error = %err,
                            "could not extract dependencies; assuming none"
                        );
                        Vec::new()
                    }
                };
                (file.clone(), deps)
            })
            .collect()
    }

    fn is_stale(&self, file: &Path) -> bool {
        let output = file.with_extension(&self.output_extension);
        match self.oracle.is_up_to_date(file, &output) {
            Ok(up_to_date) => !up_to_date,
            Err(err) => {
                debug!(file = %file.display(), error = %err, "staleness check failed; treating as stale");
                true
            }
        }
    }
}
