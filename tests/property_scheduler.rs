// tests/property_scheduler.rs

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use proptest::prelude::*;
use texbake::dag::Scheduler;
use texbake::types::TaskOutcome;
use texbake_test_utils::builders::PlanBuilder;

fn name(i: usize) -> String {
    format!("doc_{i}.tex")
}

/// Random acyclic build: file N may only depend on files 0..N-1.
#[derive(Debug, Clone)]
struct Build {
    deps: Vec<Vec<usize>>,
    failing: HashSet<usize>,
    /// Drives which in-flight file completes next.
    picks: Vec<usize>,
}

fn build_strategy(max_files: usize) -> impl Strategy<Value = Build> {
    (1..=max_files).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), n),
            proptest::collection::hash_set(0..n, 0..=n / 2),
            proptest::collection::vec(any::<usize>(), 1..32),
        )
            .prop_map(move |(raw, failing, picks)| {
                let deps = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, potential)| {
                        let mut valid: Vec<usize> = if i == 0 {
                            Vec::new()
                        } else {
                            potential.into_iter().map(|d| d % i).collect()
                        };
                        valid.sort();
                        valid.dedup();
                        valid
                    })
                    .collect();
                Build {
                    deps,
                    failing,
                    picks,
                }
            })
    })
}

struct Trace {
    outcomes: HashMap<PathBuf, TaskOutcome>,
    dispatched_at: HashMap<PathBuf, u64>,
    finished_at: HashMap<PathBuf, u64>,
    total: usize,
}

/// Drive the pure scheduler the way the runtime does, completing in-flight
/// files in an order chosen by `picks`.
fn simulate(build: &Build) -> Trace {
    let mut plan = PlanBuilder::new();
    for (i, deps) in build.deps.iter().enumerate() {
        let dep_names: Vec<String> = deps.iter().map(|d| name(*d)).collect();
        let dep_refs: Vec<&str> = dep_names.iter().map(String::as_str).collect();
        plan = plan.file_after(&name(i), &dep_refs);
    }
    let mut scheduler = plan.scheduler();

    let failing: HashSet<PathBuf> = build.failing.iter().map(|i| PathBuf::from(name(*i))).collect();
    let mut picks = build.picks.iter().cycle();
    let mut in_flight: Vec<PathBuf> = Vec::new();
    let mut clock = 0u64;
    let mut dispatched_at = HashMap::new();
    let mut finished_at = HashMap::new();

    loop {
        let step = scheduler.step_ready();
        for file in step.newly_dispatched {
            dispatched_at.insert(file.clone(), clock);
            in_flight.push(file);
        }
        clock += 1;

        if in_flight.is_empty() {
            assert!(step.all_enqueued, "acyclic builds never stall");
            break;
        }

        let pick = *picks.next().unwrap() % in_flight.len();
        let file = in_flight.swap_remove(pick);
        let outcome = if failing.contains(&file) {
            TaskOutcome::Failed
        } else {
            TaskOutcome::Compiled
        };
        finished_at.insert(file.clone(), clock);
        clock += 1;
        scheduler.record(&file, outcome);
    }

    assert!(scheduler.is_finished());
    let summary = scheduler.summary();
    let mut outcomes = HashMap::new();
    for f in &summary.compiled {
        outcomes.insert(f.clone(), TaskOutcome::Compiled);
    }
    for f in &summary.failed {
        outcomes.insert(f.clone(), TaskOutcome::Failed);
    }
    for f in &summary.skipped {
        outcomes.insert(f.clone(), TaskOutcome::Skipped);
    }

    Trace {
        outcomes,
        dispatched_at,
        finished_at,
        total: summary.total(),
    }
}

proptest! {
    #[test]
    fn every_file_gets_exactly_one_outcome(build in build_strategy(12)) {
        let trace = simulate(&build);
        prop_assert_eq!(trace.total, build.deps.len());
        prop_assert_eq!(trace.outcomes.len(), build.deps.len());
    }

    #[test]
    fn outcomes_follow_the_cascade_rule(build in build_strategy(12)) {
        let trace = simulate(&build);

        // Files are in dependency order, so one forward pass is enough.
        let mut expected: Vec<TaskOutcome> = Vec::with_capacity(build.deps.len());
        for (i, deps) in build.deps.iter().enumerate() {
            let outcome = if deps.iter().any(|d| expected[*d] != TaskOutcome::Compiled) {
                TaskOutcome::Skipped
            } else if build.failing.contains(&i) {
                TaskOutcome::Failed
            } else {
                TaskOutcome::Compiled
            };
            expected.push(outcome);
        }

        for (i, outcome) in expected.iter().enumerate() {
            prop_assert_eq!(trace.outcomes.get(&PathBuf::from(name(i))), Some(outcome));
        }
    }

    #[test]
    fn dependents_dispatch_only_after_dependencies_finish(build in build_strategy(12)) {
        let trace = simulate(&build);

        for (i, deps) in build.deps.iter().enumerate() {
            let file = PathBuf::from(name(i));
            let Some(dispatched) = trace.dispatched_at.get(&file) else {
                prop_assert_eq!(trace.outcomes.get(&file), Some(&TaskOutcome::Skipped));
                continue;
            };
            for d in deps {
                let dep = PathBuf::from(name(*d));
                let finished = trace.finished_at.get(&dep);
                prop_assert!(finished.is_some(), "{:?} dispatched before {:?} ran", file, dep);
                prop_assert!(dispatched > finished.unwrap());
            }
        }
    }
}
