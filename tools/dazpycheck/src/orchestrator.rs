use crate::check::{Check, Outcome, RunContext};
use crossbeam_channel::{bounded, unbounded};
use std::num::NonZeroUsize;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// List order, on the calling thread.
    #[default]
    Sequential,
    /// Fixed worker pool sized to the host's hardware concurrency.
    Parallel,
}

impl Schedule {
    pub fn from_single_thread(single_thread: bool) -> Self {
        if single_thread {
            Schedule::Sequential
        } else {
            Schedule::Parallel
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Schedule::Sequential => "sequential",
            Schedule::Parallel => "parallel",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub overall_passed: bool,
    /// Diagnostics of failing checks. Declaration order when sequential,
    /// completion order when parallel.
    pub failures: Vec<String>,
    /// Every outcome, always in declaration order.
    pub outcomes: Vec<Outcome>,
}

impl RunResult {
    /// Reduce outcomes given in declaration order.
    pub fn from_outcomes(outcomes: Vec<Outcome>) -> Self {
        let failures = outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(failure_diagnostic)
            .collect();
        Self::reduce(outcomes, failures)
    }

    fn reduce(outcomes: Vec<Outcome>, failures: Vec<String>) -> Self {
        Self {
            overall_passed: outcomes.iter().all(|o| o.passed),
            failures,
            outcomes,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.overall_passed {
            0
        } else {
            1
        }
    }
}

/// Run every check and AND-reduce the outcomes. No check is ever skipped
/// because an earlier one failed.
pub fn run_checks(checks: &[Check], schedule: Schedule, ctx: &RunContext<'_>) -> RunResult {
    match schedule {
        Schedule::Sequential => run_sequential(checks, ctx),
        Schedule::Parallel => run_parallel(checks, ctx, worker_count(checks.len())),
    }
}

/// Hardware concurrency, capped by the amount of work, at least one.
pub fn worker_count(check_count: usize) -> usize {
    let hardware = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    hardware.min(check_count).max(1)
}

fn run_sequential(checks: &[Check], ctx: &RunContext<'_>) -> RunResult {
    let outcomes = checks.iter().map(|check| check.execute(ctx)).collect();
    RunResult::from_outcomes(outcomes)
}

pub(crate) fn run_parallel(checks: &[Check], ctx: &RunContext<'_>, workers: usize) -> RunResult {
    if checks.is_empty() {
        return RunResult::from_outcomes(Vec::new());
    }

    let (task_tx, task_rx) = bounded::<usize>(checks.len());
    for index in 0..checks.len() {
        // Capacity equals the number of tasks, so this never blocks.
        let _ = task_tx.send(index);
    }
    drop(task_tx);

    let (result_tx, result_rx) = unbounded::<(usize, Outcome)>();
    let mut slots: Vec<Option<Outcome>> = (0..checks.len()).map(|_| None).collect();
    let mut failures = Vec::new();

    thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for index in task_rx.iter() {
                    let outcome = checks[index].execute(ctx);
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for (index, outcome) in result_rx.iter() {
            if !outcome.passed {
                failures.push(failure_diagnostic(&outcome));
            }
            slots[index] = Some(outcome);
        }
    });

    RunResult::reduce(slots.into_iter().flatten().collect(), failures)
}

fn failure_diagnostic(outcome: &Outcome) -> String {
    if outcome.diagnostic.trim().is_empty() {
        format!("{} failed.", outcome.description)
    } else {
        outcome.diagnostic.clone()
    }
}
