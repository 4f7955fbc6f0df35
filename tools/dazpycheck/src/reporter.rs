use crate::orchestrator::RunResult;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};
use std::io::{self, Write};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

/// Sink for everything a run prints.
///
/// Shared by every worker in parallel mode, so each call must write its
/// message as one unit. Messages from different checks may interleave.
pub trait Reporter: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Info and success go to stdout, errors to stderr. Colour only on terminals.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Info => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{}", message.if_supports_color(Stdout, |s| s.cyan())).ok();
            }
            Level::Success => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{}", message.if_supports_color(Stdout, |s| s.green())).ok();
            }
            Level::Error => {
                let stderr = io::stderr();
                let mut err = stderr.lock();
                writeln!(err, "{}", message.if_supports_color(Stderr, |s| s.red())).ok();
            }
        }
    }
}

/// Records messages in memory instead of printing them.
#[derive(Debug, Default)]
pub struct CapturedReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl CapturedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

impl Reporter for CapturedReporter {
    fn emit(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, message.to_string()));
    }
}

/// Print the per-check table and the final verdict line. Returns true if all passed.
pub fn print_summary(reporter: &dyn Reporter, result: &RunResult) -> bool {
    reporter.info("");
    for outcome in &result.outcomes {
        let line = format!(
            "  {} {:<20} {:.1}s",
            if outcome.passed { "\u{2713}" } else { "\u{2717}" },
            outcome.description,
            outcome.elapsed.as_secs_f64(),
        );
        if outcome.passed {
            reporter.success(&line);
        } else {
            reporter.error(&line);
        }
    }

    if result.overall_passed {
        reporter.success("\nAll checks passed!");
    } else {
        reporter.error("\nSome checks failed.");
    }

    result.overall_passed
}
