// src/dag/graph.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{BakeError, Result};

/// Direct dependencies: files that must compile before this one.
#[derive(Debug, Clone, Default)]
struct DagNode {
    deps: Vec<PathBuf>,
}

/// Directed "depends-on" graph over the files of one build.
///
/// Node iteration follows insertion order, and each node's dependencies keep
/// the order in which they were added, so every traversal is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    order: Vec<PathBuf>,
    nodes: HashMap<PathBuf, DagNode>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, file: &Path) {
        if !self.nodes.contains_key(file) {
            self.order.push(file.to_path_buf());
            self.nodes.insert(file.to_path_buf(), DagNode::default());
        }
    }

    /// Record that `file` depends on `dependency`. Both nodes are created if
    /// missing; duplicate edges are ignored.
    pub fn add_edge(&mut self, file: &Path, dependency: &Path) {
        self.add_node(file);
        self.add_node(dependency);

        if let Some(node) = self.nodes.get_mut(file) {
            if !node.deps.iter().any(|d| d == dependency) {
                node.deps.push(dependency.to_path_buf());
            }
        }
    }

    pub fn contains(&self, file: &Path) -> bool {
        self.nodes.contains_key(file)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All files, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    /// Immediate dependencies of a file.
    pub fn dependencies_of(&self, file: &Path) -> &[PathBuf] {
        self.nodes
            .get(file)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Groups of files that form dependency cycles (including self-loops),
    /// each sorted, in a stable order.
    pub fn find_cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut graph: DiGraphMap<&Path, ()> = DiGraphMap::new();
        for file in self.files() {
            graph.add_node(file);
        }
        for file in self.files() {
            for dep in self.dependencies_of(file) {
                graph.add_edge(file, dep.as_path(), ());
            }
        }

        let mut cycles: Vec<Vec<PathBuf>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut files: Vec<PathBuf> = scc.into_iter().map(Path::to_path_buf).collect();
                files.sort();
                files
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Fail with [`BakeError::DependencyCycle`] listing every file that sits
    /// on a cycle.
    pub fn ensure_acyclic(&self) -> Result<()> {
        let cycles = self.find_cycles();
        if cycles.is_empty() {
            return Ok(());
        }
        let mut files: Vec<PathBuf> = cycles.into_iter().flatten().collect();
        files.sort();
        files.dedup();
        Err(BakeError::DependencyCycle { files })
    }

    /// `start` and its transitive dependencies, dependencies first.
    ///
    /// Depth-first post-order following each node's dependency order.
    pub fn topological_closure(&self, start: &Path) -> Result<Vec<PathBuf>> {
        let mut visiting: Vec<PathBuf> = Vec::new();
        let mut done: HashSet<PathBuf> = HashSet::new();
        let mut out = Vec::new();
        self.visit(start, &mut visiting, &mut done, &mut out)?;
        Ok(out)
    }

    fn visit(
        &self,
        file: &Path,
        visiting: &mut Vec<PathBuf>,
        done: &mut HashSet<PathBuf>,
        out: &mut Vec<PathBuf>,
    ) -> Result<()> {
        if done.contains(file) {
            return Ok(());
        }
        if let Some(pos) = visiting.iter().position(|p| p == file) {
            let mut files = visiting[pos..].to_vec();
            files.sort();
            return Err(BakeError::DependencyCycle { files });
        }

        visiting.push(file.to_path_buf());
        for dep in self.dependencies_of(file) {
            self.visit(dep, visiting, done, out)?;
        }
        visiting.pop();

        done.insert(file.to_path_buf());
        out.push(file.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn diamond() -> DependencyGraph {
        let mut g = DependencyGraph::new();
        g.add_node(&p("A"));
        g.add_edge(&p("B"), &p("A"));
        g.add_edge(&p("C"), &p("A"));
        g.add_edge(&p("D"), &p("B"));
        g.add_edge(&p("D"), &p("C"));
        g
    }

    #[test]
    fn closure_lists_dependencies_before_dependents() {
        let g = diamond();
        assert_eq!(
            g.topological_closure(&p("D")).unwrap(),
            vec![p("A"), p("B"), p("C"), p("D")]
        );
        assert_eq!(g.topological_closure(&p("A")).unwrap(), vec![p("A")]);
    }

    #[test]
    fn cycles_are_reported_with_all_members() {
        let mut g = diamond();
        g.add_edge(&p("A"), &p("D"));
        g.add_edge(&p("E"), &p("E"));

        let cycles = g.find_cycles();
        assert_eq!(
            cycles,
            vec![vec![p("A"), p("B"), p("C"), p("D")], vec![p("E")]]
        );

        match g.ensure_acyclic() {
            Err(BakeError::DependencyCycle { files }) => {
                assert_eq!(files, vec![p("A"), p("B"), p("C"), p("D"), p("E")]);
            }
            other => panic!("expected DependencyCycle, got {:?}", other),
        }

        assert!(matches!(
            g.topological_closure(&p("D")),
            Err(BakeError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut g = DependencyGraph::new();
        g.add_edge(&p("B"), &p("A"));
        g.add_edge(&p("B"), &p("A"));
        assert_eq!(g.dependencies_of(&p("B")), &[p("A")]);
        assert_eq!(g.len(), 2);
    }
}
