use crate::reporter::Reporter;
use crate::runner::{CommandCall, CommandRunner};
use crate::timing::Stopwatch;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One problem location, usually `path:line: message`.
pub type Finding = String;

/// What a check gets to work with. Shared read-only by every worker.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub root: &'a Path,
    pub reporter: &'a dyn Reporter,
    pub runner: &'a dyn CommandRunner,
}

pub type ScanFn = Arc<dyn Fn(&RunContext<'_>) -> Vec<Finding> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Outcome {
    pub description: String,
    pub passed: bool,
    /// Empty when passed. Never empty when failed.
    pub diagnostic: String,
    pub elapsed: Duration,
}

/// Delegates to an external command; passes on exit status zero.
#[derive(Debug, Clone)]
pub struct ProcessCheck {
    pub description: String,
    pub command: CommandCall,
}

/// Inspects the tree in-process; passes when it finds nothing.
#[derive(Clone)]
pub struct ScanCheck {
    pub description: String,
    scan: ScanFn,
}

impl fmt::Debug for ScanCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanCheck")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Check {
    Process(ProcessCheck),
    Scan(ScanCheck),
}

impl Check {
    pub fn process(description: impl Into<String>, command: CommandCall) -> Self {
        Check::Process(ProcessCheck {
            description: description.into(),
            command,
        })
    }

    pub fn scan<F>(description: impl Into<String>, scan: F) -> Self
    where
        F: Fn(&RunContext<'_>) -> Vec<Finding> + Send + Sync + 'static,
    {
        Check::Scan(ScanCheck {
            description: description.into(),
            scan: Arc::new(scan),
        })
    }

    pub fn description(&self) -> &str {
        match self {
            Check::Process(check) => &check.description,
            Check::Scan(check) => &check.description,
        }
    }

    /// Run the check to completion. Never panics on tool or I/O failure:
    /// every problem ends up in the returned outcome.
    pub fn execute(&self, ctx: &RunContext<'_>) -> Outcome {
        let stopwatch = Stopwatch::start();
        ctx.reporter.info(&format!("Running {}...", self.description()));

        let (passed, diagnostic) = match self {
            Check::Process(check) => check.execute(ctx),
            Check::Scan(check) => check.execute(ctx),
        };

        Outcome {
            description: self.description().to_string(),
            passed,
            diagnostic,
            elapsed: stopwatch.elapsed(),
        }
    }
}

impl ProcessCheck {
    fn execute(&self, ctx: &RunContext<'_>) -> (bool, String) {
        let result = match ctx.runner.run(&self.command) {
            Ok(result) => result,
            Err(error) => {
                let diagnostic = format!(
                    "{} failed.\nfailed to launch `{}`: {error}",
                    self.description, self.command.program
                );
                ctx.reporter.error(&diagnostic);
                return (false, diagnostic);
            }
        };

        if result.success() {
            if !result.stdout.trim().is_empty() {
                ctx.reporter.info(result.stdout.trim_end());
            }
            if !result.stderr.trim().is_empty() {
                ctx.reporter.error(result.stderr.trim_end());
            }
            ctx.reporter.success(&format!("{} passed!", self.description));
            return (true, String::new());
        }

        let mut diagnostic = format!("{} failed.\n{}\n{}", self.description, result.stdout, result.stderr);
        if result.status.is_none() {
            diagnostic.push_str("\nterminated by signal");
        }
        ctx.reporter.error(&diagnostic);
        (false, diagnostic)
    }
}

impl ScanCheck {
    fn execute(&self, ctx: &RunContext<'_>) -> (bool, String) {
        let findings = (self.scan)(ctx);
        if findings.is_empty() {
            ctx.reporter.success(&format!("{} passed!", self.description));
            return (true, String::new());
        }

        for finding in &findings {
            ctx.reporter.error(finding);
        }
        ctx.reporter.error(&format!(
            "{} failed with {} finding(s).",
            self.description,
            findings.len()
        ));
        (false, findings.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{CapturedReporter, Level};
    use crate::runner::RealCommandRunner;

    fn sh(description: &str, script: &str) -> Check {
        Check::process(
            description,
            CommandCall::new("sh", vec!["-c".to_string(), script.to_string()]),
        )
    }

    fn run(check: &Check, reporter: &CapturedReporter) -> Outcome {
        let ctx = RunContext {
            root: Path::new("."),
            reporter,
            runner: &RealCommandRunner,
        };
        check.execute(&ctx)
    }

    #[test]
    fn process_check_passes_on_zero_exit() {
        let reporter = CapturedReporter::new();
        let outcome = run(&sh("Echo", "echo hello"), &reporter);

        assert!(outcome.passed);
        assert!(outcome.diagnostic.is_empty());
        assert_eq!(outcome.description, "Echo");
        assert!(reporter.contains(Level::Info, "Running Echo..."));
        assert!(reporter.contains(Level::Info, "hello"));
        assert!(reporter.contains(Level::Success, "Echo passed!"));
    }

    #[test]
    fn process_check_echoes_stderr_of_passing_command_without_failing() {
        let reporter = CapturedReporter::new();
        let outcome = run(&sh("Warn", "echo careful >&2"), &reporter);

        assert!(outcome.passed);
        assert!(reporter.contains(Level::Error, "careful"));
        assert!(reporter.contains(Level::Success, "Warn passed!"));
    }

    #[test]
    fn process_check_fails_with_captured_stderr() {
        let reporter = CapturedReporter::new();
        let outcome = run(&sh("Compile", "echo 'syntax error' >&2; exit 2"), &reporter);

        assert!(!outcome.passed);
        assert!(outcome.diagnostic.contains("syntax error"));
        assert!(outcome.diagnostic.starts_with("Compile failed."));
        assert!(reporter.contains(Level::Error, "syntax error"));
        assert!(!reporter.contains(Level::Success, "Compile passed!"));
    }

    #[test]
    fn process_check_fails_on_nonzero_exit_without_output() {
        let reporter = CapturedReporter::new();
        let outcome = run(&sh("Silent", "exit 1"), &reporter);
        assert!(!outcome.passed);
        assert!(!outcome.diagnostic.is_empty());
    }

    #[test]
    fn process_check_turns_spawn_failure_into_outcome() {
        let reporter = CapturedReporter::new();
        let check = Check::process(
            "Missing tool",
            CommandCall::new("this-command-does-not-exist-xyz", Vec::new()),
        );
        let outcome = run(&check, &reporter);

        assert!(!outcome.passed);
        assert!(outcome.diagnostic.contains("failed to launch `this-command-does-not-exist-xyz`"));
        assert!(reporter.contains(Level::Error, "Missing tool failed."));
    }

    #[test]
    fn scan_check_passes_on_no_findings() {
        let reporter = CapturedReporter::new();
        let outcome = run(&Check::scan("Clean scan", |_| Vec::new()), &reporter);

        assert!(outcome.passed);
        assert!(outcome.diagnostic.is_empty());
        assert!(reporter.contains(Level::Success, "Clean scan passed!"));
    }

    #[test]
    fn scan_check_reports_every_finding() {
        let reporter = CapturedReporter::new();
        let check = Check::scan("Dirty scan", |ctx| {
            vec![
                format!("{}/a.py:1: first", ctx.root.display()),
                format!("{}/b.py:2: second", ctx.root.display()),
            ]
        });
        let outcome = run(&check, &reporter);

        assert!(!outcome.passed);
        assert_eq!(outcome.diagnostic, "./a.py:1: first\n./b.py:2: second");
        assert!(reporter.contains(Level::Error, "./a.py:1: first"));
        assert!(reporter.contains(Level::Error, "./b.py:2: second"));
        assert!(reporter.contains(Level::Error, "Dirty scan failed with 2 finding(s)."));
    }

    #[test]
    fn checks_are_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Check>();
    }
}
