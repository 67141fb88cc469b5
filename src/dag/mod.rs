// src/dag/mod.rs

//! Dependency graph, build planning and scheduling.
//!
//! - [`graph`] holds the "depends-on" graph and cycle detection.
//! - [`planner`] decides which files are dirty and orders them.
//! - [`scheduler`] contains the per-build state machine that decides which
//!   files are ready to dispatch and which must be skipped.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`state`] holds the coordinator's bookkeeping sets.

pub mod graph;
pub mod planner;
pub mod scheduler;
pub mod scheduler_step;
pub mod state;

pub use graph::DependencyGraph;
pub use planner::{BuildPlan, Planner};
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use state::BuildState;
